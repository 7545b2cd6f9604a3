//! `QualityGateEngine::check` (§4.K): reads current metrics, evaluates the
//! seven thresholds, and persists the run as a `CICDRun`.

use std::sync::Arc;

use domain::{GateResult, QualityGateConfig, RepoId, TriggeredBy};
use tracing::{info, warn};

use crate::check::evaluate;
use crate::error::Result;
use crate::metrics;

#[derive(Clone)]
pub struct QualityGateEngine {
    storage: Arc<store::Storage>,
}

impl QualityGateEngine {
    pub fn new(storage: Arc<store::Storage>) -> Self {
        Self { storage }
    }

    pub fn get_config(&self, repo_id: RepoId) -> Result<QualityGateConfig> {
        Ok(self.storage.get_gate_config(repo_id)?)
    }

    pub fn put_config(&self, config: &QualityGateConfig) -> Result<()> {
        Ok(self.storage.put_gate_config(config)?)
    }

    pub fn history(&self, repo_id: RepoId) -> Result<Vec<domain::CicdRun>> {
        Ok(self.storage.list_cicd_runs(repo_id)?)
    }

    pub fn get_run(&self, run_id: i64) -> Result<domain::CicdRun> {
        Ok(self.storage.get_cicd_run(run_id)?)
    }

    /// Runs one gate evaluation. Concurrent calls against the same repo are
    /// serialized for run-id assignment (SQLite's writer lock, §5) but may
    /// evaluate in parallel; each produces a distinct, immutable run.
    pub fn check(
        &self,
        repo_id: RepoId,
        branch: Option<&str>,
        commit: Option<&str>,
        pr_number: Option<i64>,
        triggered_by: TriggeredBy,
    ) -> Result<GateResult> {
        let run_id = self.storage.start_cicd_run(repo_id, branch, commit, pr_number, triggered_by)?;

        let config = self.storage.get_gate_config(repo_id)?;
        let snapshot = match metrics::snapshot(&self.storage, repo_id) {
            Ok(s) => s,
            Err(e) => {
                warn!(repo_id = repo_id.get(), error = %e, "gate check failed to read metrics");
                self.storage.error_cicd_run(run_id, &e.to_string())?;
                return Err(e);
            }
        };

        let result = evaluate(&config, &snapshot, run_id);
        self.storage.complete_cicd_run(run_id, &result)?;
        info!(
            repo_id = repo_id.get(),
            run_id,
            passed = result.passed,
            score = result.quality_score,
            "quality gate check completed"
        );
        Ok(result)
    }
}
