//! `GET /runs/:repo` and `GET /report/:run` (§6): CI run history, and a
//! standalone HTML report for one run.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use domain::RepoId;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::AppResult;

pub async fn list_runs(State(state): State<AppState>, Path(repo): Path<i64>) -> AppResult<impl IntoResponse> {
    let runs = state.gate.history(RepoId(repo))?;
    Ok(Json(ApiResponse::success(runs)))
}

pub async fn report(State(state): State<AppState>, Path(run): Path<i64>) -> AppResult<impl IntoResponse> {
    let run = state.gate.get_run(run)?;
    let html = render_report(&run);
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html))
}

fn render_report(run: &domain::CicdRun) -> String {
    let status = match run.status {
        domain::RunStatus::Running => "running",
        domain::RunStatus::Passed => "passed",
        domain::RunStatus::Failed => "failed",
        domain::RunStatus::Error => "error",
    };

    let checks_html = run
        .gate_result
        .as_ref()
        .map(|r| {
            r.checks
                .iter()
                .map(|c| {
                    format!(
                        "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td></tr>",
                        html_escape(&c.name),
                        if c.passed { "pass" } else { "fail" },
                        c.value,
                        c.threshold,
                        html_escape(&c.message),
                    )
                })
                .collect::<String>()
        })
        .unwrap_or_default();

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Run {run_id}</title></head><body>\
         <h1>CI Run {run_id}</h1>\
         <p>Repository: {repo_id}</p>\
         <p>Status: {status}</p>\
         <p>Branch: {branch}</p>\
         <p>Commit: {commit}</p>\
         <table border=\"1\" cellpadding=\"4\"><thead><tr><th>Check</th><th>Result</th><th>Value</th><th>Threshold</th><th>Message</th></tr></thead>\
         <tbody>{checks_html}</tbody></table>\
         </body></html>",
        run_id = run.id,
        repo_id = run.repo_id.get(),
        status = status,
        branch = run.branch.as_deref().unwrap_or("-"),
        commit = run.commit.as_deref().unwrap_or("-"),
        checks_html = checks_html,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
