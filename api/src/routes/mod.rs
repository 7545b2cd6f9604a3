pub mod gate;
pub mod repos;
pub mod runs;
pub mod search;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;

use crate::core::app_state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/repos/submit", post(repos::submit))
        .route("/repos/{id}", get(repos::get_repo))
        .route("/repos/{id}/files", get(repos::list_files))
        .route("/repos/{id}/files/{*rest}", get(repos::file_content))
        .route("/repos/{id}/symbols", get(repos::list_symbols))
        .route("/repos/{id}/call-graph", get(repos::call_graph))
        .route("/repos/{id}/dependencies", get(repos::dependencies))
        .route("/repos/{id}/dead-code", get(repos::dead_code))
        .route("/repos/{id}/circular-deps", get(repos::circular_deps))
        .route("/search/semantic", post(search::semantic_search))
        .route("/quality-gate/{repo}", get(gate::get_config).put(gate::put_config))
        .route("/quality-gate/{repo}/check", post(gate::check))
        .route("/webhook/ci", post(webhook::ci_webhook))
        .route("/runs/{repo}", get(runs::list_runs))
        .route("/report/{run}", get(runs::report))
        .with_state(state)
}
