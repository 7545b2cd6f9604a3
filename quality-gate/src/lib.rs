//! Threshold evaluation, CICDRun bookkeeping, and the CI webhook mapping
//! (§4.K). `evaluate` in [`check`] is pure (§8 property 8); [`QualityGateEngine`]
//! wires it to the durable store and assigns run ids.

pub mod check;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod webhook;

pub use check::{evaluate, quality_score};
pub use engine::QualityGateEngine;
pub use error::{GateError, Result};
pub use metrics::MetricsSnapshot;
pub use webhook::{CheckRequest, PullRequest, PullRequestHead, WebhookHandle, WebhookPayload, WebhookRepository};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::{RepositorySpec, TriggeredBy};

    use super::*;

    fn engine() -> (QualityGateEngine, Arc<store::Storage>, domain::RepoId) {
        let storage = Arc::new(store::Storage::open_in_memory().unwrap());
        let repo_id = storage
            .create_repository(RepositorySpec {
                source: domain::RepoSource::Upload,
                origin_url: None,
                branch: None,
                archive_path: Some("x.zip".into()),
            })
            .unwrap();
        (QualityGateEngine::new(storage.clone()), storage, repo_id)
    }

    #[test]
    fn check_on_empty_repo_passes_default_gate() {
        let (engine, _storage, repo_id) = engine();
        let result = engine.check(repo_id, None, None, None, TriggeredBy::Manual).unwrap();
        assert!(result.passed);
        assert!(!result.block_merge);
    }

    #[test]
    fn history_accumulates_distinct_runs() {
        let (engine, _storage, repo_id) = engine();
        engine.check(repo_id, None, None, None, TriggeredBy::Manual).unwrap();
        engine.check(repo_id, None, None, None, TriggeredBy::Webhook).unwrap();
        let runs = engine.history(repo_id).unwrap();
        assert_eq!(runs.len(), 2);
        assert_ne!(runs[0].id, runs[1].id);
    }

    #[test]
    fn config_round_trips_through_storage() {
        let (engine, _storage, repo_id) = engine();
        let mut config = engine.get_config(repo_id).unwrap();
        config.max_complexity = 5;
        engine.put_config(&config).unwrap();
        assert_eq!(engine.get_config(repo_id).unwrap().max_complexity, 5);
    }
}
