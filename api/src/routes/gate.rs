//! `/quality-gate/*` (§6): read/update thresholds, and run a check
//! on demand (`triggered_by=manual`; the webhook route runs the same
//! engine with `triggered_by=webhook`).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use domain::{QualityGateConfig, RepoId, TriggeredBy};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::AppResult;

pub async fn get_config(State(state): State<AppState>, Path(repo): Path<i64>) -> AppResult<impl IntoResponse> {
    let config = state.gate.get_config(RepoId(repo))?;
    Ok(Json(ApiResponse::success(config)))
}

pub async fn put_config(
    State(state): State<AppState>,
    Path(repo): Path<i64>,
    Json(mut config): Json<QualityGateConfig>,
) -> AppResult<impl IntoResponse> {
    config.repo_id = RepoId(repo);
    state.gate.put_config(&config)?;
    Ok(Json(ApiResponse::success(config)))
}

#[derive(Deserialize, Default)]
pub struct CheckRequest {
    pub branch: Option<String>,
    pub commit: Option<String>,
    pub pr_number: Option<i64>,
    /// Defaults to `manual` (the UI "run now" button); the pre-commit CLI
    /// sets this to `precommit` so `CICDRun.triggered_by` reflects its
    /// origin (§4.K).
    pub triggered_by: Option<TriggeredBy>,
}

pub async fn check(
    State(state): State<AppState>,
    Path(repo): Path<i64>,
    body: Option<Json<CheckRequest>>,
) -> AppResult<impl IntoResponse> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let result = state.gate.check(
        RepoId(repo),
        req.branch.as_deref(),
        req.commit.as_deref(),
        req.pr_number,
        req.triggered_by.unwrap_or(TriggeredBy::Manual),
    )?;
    Ok(Json(ApiResponse::success(result)))
}
