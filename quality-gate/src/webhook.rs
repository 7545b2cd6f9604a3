//! Maps the external `pull_request.{opened,synchronize,reopened}` CI
//! webhook event to a `Check` call (§4.K, §6). HMAC verification of
//! `WEBHOOK_SIGNING_SECRET` is the `api` crate route's job — the boundary
//! named in SPEC_FULL §6: the route shape is external, this mapping isn't.

use serde::Deserialize;

use domain::RepoId;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub event_type: String,
    pub pull_request: PullRequest,
    pub repository: WebhookRepository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: i64,
    pub title: String,
    pub head: PullRequestHead,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHead {
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRepository {
    pub clone_url: String,
}

/// A webhook event translated into a concrete `Check` request; `None` when
/// the event type isn't one of the three that trigger a gate run (the
/// handler ignores unknown event types per §6).
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub branch: String,
    pub commit: String,
    pub pr_number: i64,
}

const TRIGGERING_EVENTS: &[&str] =
    &["pull_request.opened", "pull_request.synchronize", "pull_request.reopened"];

/// Pure mapping from payload to gate-check request; resolving
/// `repository.clone_url` to a known `RepoId` is the caller's job (it owns
/// the store lookup), so this returns the request alongside the clone url.
pub fn map_event(payload: &WebhookPayload) -> Option<CheckRequest> {
    if !TRIGGERING_EVENTS.contains(&payload.event_type.as_str()) {
        return None;
    }
    Some(CheckRequest {
        branch: payload.pull_request.head.git_ref.clone(),
        commit: payload.pull_request.head.sha.clone(),
        pr_number: payload.pull_request.number,
    })
}

/// Thin handle the `api` crate's webhook route drives: resolve the repo by
/// clone URL, then run `Check` with `triggered_by=webhook`.
pub struct WebhookHandle<'a> {
    engine: &'a crate::QualityGateEngine,
}

impl<'a> WebhookHandle<'a> {
    pub fn new(engine: &'a crate::QualityGateEngine) -> Self {
        Self { engine }
    }

    /// Returns `Ok(None)` for an ignored event type, `Ok(Some(result))` for
    /// a triggered gate run, and an error if the repo can't be resolved or
    /// the check itself fails.
    pub fn handle(&self, repo_id: RepoId, payload: &WebhookPayload) -> crate::Result<Option<domain::GateResult>> {
        let Some(req) = map_event(payload) else { return Ok(None) };
        let result = self.engine.check(
            repo_id,
            Some(&req.branch),
            Some(&req.commit),
            Some(req.pr_number),
            domain::TriggeredBy::Webhook,
        )?;
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(event_type: &str) -> WebhookPayload {
        WebhookPayload {
            event_type: event_type.into(),
            pull_request: PullRequest {
                number: 42,
                title: "fix: widget".into(),
                head: PullRequestHead { sha: "abc123".into(), git_ref: "feature/widget".into() },
            },
            repository: WebhookRepository { clone_url: "https://example.com/r.git".into() },
        }
    }

    #[test]
    fn triggering_events_map_to_a_check_request() {
        for event in TRIGGERING_EVENTS {
            let req = map_event(&payload(event)).expect("should map");
            assert_eq!(req.commit, "abc123");
            assert_eq!(req.pr_number, 42);
        }
    }

    #[test]
    fn unknown_event_types_are_ignored() {
        assert!(map_event(&payload("pull_request.closed")).is_none());
        assert!(map_event(&payload("push")).is_none());
    }
}
