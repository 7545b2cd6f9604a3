//! `/repos/*` (§6): submit, metadata, file listing/content, symbols, and
//! the three graph views (call graph, file dependencies, dead code,
//! circular dependencies). Dead-code and cycle findings have no store
//! table of their own -- they're recomputed from persisted symbols/edges
//! on every request, the same snapshot `callgraph::analyze` works over
//! during the CallGraph fan-out task.

use std::io::Write as _;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use domain::{RepoId, RepoSource, RepositorySpec, Symbol, SymbolFilter, SymbolKind};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::{AppError, AppResult};

#[derive(Serialize)]
pub struct SubmitResponse {
    pub repo_id: i64,
}

/// Accepts multipart form data either way: a `archive` file field submits
/// an upload, an `origin_url` (+ optional `branch`) text field submits a
/// remote clone. One content type for the whole endpoint keeps the route
/// table honest about what `/repos/submit` actually parses.
pub async fn submit(State(state): State<AppState>, mut multipart: Multipart) -> AppResult<impl IntoResponse> {
    let mut origin_url: Option<String> = None;
    let mut branch: Option<String> = None;
    let mut archive_path: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "origin_url" => origin_url = Some(field.text().await?),
            "branch" => branch = Some(field.text().await?),
            "archive" => {
                let data = field.bytes().await?;
                let mut temp = tempfile::Builder::new()
                    .prefix("coderadar-upload-")
                    .suffix(".zip")
                    .tempfile()
                    .map_err(io_error)?;
                temp.write_all(&data).map_err(io_error)?;
                let (_file, path) = temp.keep().map_err(|e| io_error(e.error))?;
                archive_path = Some(path.to_string_lossy().into_owned());
            }
            _ => {}
        }
    }

    let spec = if let Some(archive_path) = archive_path {
        RepositorySpec { source: RepoSource::Upload, origin_url: None, branch: None, archive_path: Some(archive_path) }
    } else if let Some(origin_url) = origin_url {
        RepositorySpec { source: RepoSource::Remote, origin_url: Some(origin_url), branch, archive_path: None }
    } else {
        return Err(AppError::BadRequest(
            "expected an 'archive' file field or an 'origin_url' field".to_string(),
        ));
    };

    let repo_id = state.storage.create_repository(spec)?;
    state.scheduler.submit_pipeline(repo_id).await;
    Ok(Json(ApiResponse::success(SubmitResponse { repo_id: repo_id.get() })))
}

fn io_error(e: std::io::Error) -> AppError {
    AppError::Http { status: StatusCode::INTERNAL_SERVER_ERROR, code: "IO_ERROR", message: e.to_string() }
}

pub async fn get_repo(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    let repo = state.storage.get_repository(RepoId(id))?;
    Ok(Json(ApiResponse::success(repo)))
}

pub async fn list_files(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    let files = state.storage.list_files(RepoId(id))?;
    Ok(Json(ApiResponse::success(files)))
}

/// `GET /repos/:id/files/*rest`, where `rest` is expected to end in
/// `/content` -- the bracketed `[/:path/content]` alternative of §6's route
/// table, folded into one handler since axum only allows a wildcard as the
/// final path segment.
pub async fn file_content(State(state): State<AppState>, Path((id, rest)): Path<(i64, String)>) -> AppResult<impl IntoResponse> {
    let Some(path) = rest.strip_suffix("/content") else {
        return Err(AppError::NotFound(rest));
    };
    let content = state.storage.get_file_content(RepoId(id), path)?;
    Ok((StatusCode::OK, content))
}

#[derive(Deserialize)]
pub struct SymbolQuery {
    pub file_id: Option<i64>,
    pub kind: Option<String>,
    pub name_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn list_symbols(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<SymbolQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = SymbolFilter {
        repo_id: Some(RepoId(id)),
        file_id: q.file_id.map(domain::FileId),
        kind: q.kind.as_deref().and_then(parse_symbol_kind),
        name_contains: q.name_contains,
        limit: q.limit,
        offset: q.offset,
    };
    let symbols = state.storage.list_symbols(&filter)?;
    Ok(Json(ApiResponse::success(symbols)))
}

fn parse_symbol_kind(s: &str) -> Option<SymbolKind> {
    match s.to_ascii_lowercase().as_str() {
        "function" => Some(SymbolKind::Function),
        "class" => Some(SymbolKind::Class),
        "method" => Some(SymbolKind::Method),
        "variable" => Some(SymbolKind::Variable),
        "procedure" => Some(SymbolKind::Procedure),
        _ => None,
    }
}

#[derive(Serialize)]
pub struct CallGraphResponse {
    pub nodes: Vec<Symbol>,
    pub edges: Vec<domain::CallEdge>,
}

pub async fn call_graph(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    let repo_id = RepoId(id);
    let nodes = state.storage.list_symbols(&SymbolFilter { repo_id: Some(repo_id), ..Default::default() })?;
    let edges = state.storage.list_call_edges(repo_id)?;
    Ok(Json(ApiResponse::success(CallGraphResponse { nodes, edges })))
}

#[derive(Serialize)]
pub struct DependenciesResponse {
    pub files: Vec<domain::File>,
    pub edges: Vec<domain::ImportEdge>,
}

pub async fn dependencies(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    let repo_id = RepoId(id);
    let files = state.storage.list_files(repo_id)?;
    let edges = state.storage.list_import_edges(repo_id)?;
    Ok(Json(ApiResponse::success(DependenciesResponse { files, edges })))
}

#[derive(Serialize)]
pub struct DeadCodeEntry {
    pub symbol_id: i64,
    pub name: String,
    pub file_id: i64,
    pub severity: &'static str,
    pub outgoing_calls: usize,
}

pub async fn dead_code(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    let repo_id = RepoId(id);
    let symbols = state.storage.list_symbols(&SymbolFilter { repo_id: Some(repo_id), ..Default::default() })?;
    let raw_edges = state.storage.list_call_edges(repo_id)?;
    let files = state.storage.list_files(repo_id)?;
    let report = callgraph::analyze(&symbols, &raw_edges, &files);

    let entries: Vec<DeadCodeEntry> = report
        .dead_code
        .into_iter()
        .map(|f| DeadCodeEntry {
            symbol_id: f.symbol_id.get(),
            name: f.name,
            file_id: f.file_id.get(),
            severity: match f.severity {
                callgraph::DeadCodeSeverity::Low => "low",
                callgraph::DeadCodeSeverity::Medium => "medium",
                callgraph::DeadCodeSeverity::High => "high",
            },
            outgoing_calls: f.outgoing_calls,
        })
        .collect();
    Ok(Json(ApiResponse::success(entries)))
}

#[derive(Serialize)]
pub struct CycleEntry {
    pub members: Vec<i64>,
    pub member_names: Vec<String>,
    pub severity: &'static str,
}

#[derive(Serialize)]
pub struct FileCycleEntry {
    pub members: Vec<i64>,
    pub severity: &'static str,
}

#[derive(Serialize)]
pub struct CircularDepsResponse {
    pub call_cycles: Vec<CycleEntry>,
    pub file_cycles: Vec<FileCycleEntry>,
}

fn cycle_severity_str(s: callgraph::CycleSeverity) -> &'static str {
    match s {
        callgraph::CycleSeverity::Medium => "medium",
        callgraph::CycleSeverity::High => "high",
        callgraph::CycleSeverity::Critical => "critical",
    }
}

pub async fn circular_deps(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<impl IntoResponse> {
    let repo_id = RepoId(id);
    let symbols = state.storage.list_symbols(&SymbolFilter { repo_id: Some(repo_id), ..Default::default() })?;
    let raw_edges = state.storage.list_call_edges(repo_id)?;
    let resolved_edges = callgraph::resolve(&symbols, &raw_edges);
    let call_cycles = callgraph::find_cycles(&symbols, &resolved_edges)
        .into_iter()
        .map(|c| CycleEntry {
            members: c.members.iter().map(|m| m.get()).collect(),
            member_names: c.member_names,
            severity: cycle_severity_str(c.severity),
        })
        .collect();

    let files = state.storage.list_files(repo_id)?;
    let import_edges = state.storage.list_import_edges(repo_id)?;
    let resolved_imports = callgraph::resolve_imports(&files, &import_edges);
    let file_cycles = callgraph::find_import_cycles(&files, &resolved_imports)
        .into_iter()
        .map(|c| FileCycleEntry {
            members: c.members.iter().map(|m| m.get()).collect(),
            severity: cycle_severity_str(c.severity),
        })
        .collect();

    Ok(Json(ApiResponse::success(CircularDepsResponse { call_cycles, file_cycles })))
}
