//! `POST /search/semantic` (§6): embeds the query text with the same
//! provider used to embed symbols, then ranks the index by cosine
//! similarity.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use domain::{Language, RepoId, SearchFilter, SearchHit};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::{AppError, AppResult};

const DEFAULT_K: usize = 20;
const DEFAULT_THRESHOLD: f32 = 0.5;

#[derive(Deserialize)]
pub struct SemanticSearchRequest {
    pub query: String,
    pub threshold: Option<f32>,
    pub language: Option<String>,
    pub repo: Option<i64>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SemanticSearchHit {
    pub symbol_id: i64,
    pub similarity: f32,
    pub name: Option<String>,
    pub file_id: Option<i64>,
}

fn parse_language(s: &str) -> Option<Language> {
    match s.to_ascii_lowercase().as_str() {
        "python" => Some(Language::Python),
        "c" => Some(Language::C),
        "cobol" => Some(Language::Cobol),
        "assembly" => Some(Language::Assembly),
        _ => None,
    }
}

pub async fn semantic_search(
    State(state): State<AppState>,
    Json(req): Json<SemanticSearchRequest>,
) -> AppResult<impl IntoResponse> {
    if req.query.trim().is_empty() {
        return Err(AppError::BadRequest("query must not be empty".to_string()));
    }

    let vector = vector_index::embed_normalized(state.embedding_provider.as_ref(), &req.query)
        .await
        .map_err(|e| AppError::Http {
            status: axum::http::StatusCode::BAD_GATEWAY,
            code: "EMBEDDING_PROVIDER_ERROR",
            message: e.to_string(),
        })?;

    let filter = SearchFilter {
        language: req.language.as_deref().and_then(parse_language),
        repo_id: req.repo.map(RepoId),
    };
    let threshold = req.threshold.unwrap_or(DEFAULT_THRESHOLD);
    let k = req.limit.unwrap_or(DEFAULT_K);

    let hits: Vec<SearchHit> = state.embedding_index.query(vector, threshold, filter, k).await?;

    let enriched: Vec<SemanticSearchHit> = hits
        .into_iter()
        .map(|hit| match state.storage.get_symbol(hit.symbol_id) {
            Ok(symbol) => SemanticSearchHit {
                symbol_id: hit.symbol_id.get(),
                similarity: hit.similarity,
                name: Some(symbol.name),
                file_id: Some(symbol.file_id.get()),
            },
            Err(_) => SemanticSearchHit { symbol_id: hit.symbol_id.get(), similarity: hit.similarity, name: None, file_id: None },
        })
        .collect();

    Ok(Json(ApiResponse::success(enriched)))
}
