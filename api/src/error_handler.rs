use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::core::app_state::ConfigError;
use crate::core::http::response_envelope::ApiResponse;

/// Public application error type. Every subsystem error type gets a
/// `#[from]` conversion here rather than handlers matching on each crate's
/// own error enum (§7: "one error surface for the HTTP layer").
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] store::StoreError),

    #[error(transparent)]
    Fetch(#[from] source_fetcher::FetchError),

    #[error(transparent)]
    Gate(#[from] quality_gate::GateError),

    #[error(transparent)]
    VectorIndex(#[from] vector_index::VectorIndexError),

    /// Rich HTTP error mapped from lower layers with a specific status & code.
    #[error("{message}")]
    Http { status: StatusCode, code: &'static str, message: String },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Http { status, .. } => *status,
            AppError::Store(e) => store_status(e),
            AppError::Fetch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Gate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::VectorIndex(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Http { code, .. } => code,
            AppError::Store(e) => store_code(e),
            AppError::Fetch(_) => "FETCH_ERROR",
            AppError::Gate(_) => "GATE_ERROR",
            AppError::VectorIndex(_) => "VECTOR_INDEX_ERROR",
        }
    }
}

fn store_status(e: &store::StoreError) -> StatusCode {
    match e {
        store::StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        store::StoreError::Duplicate { .. } => StatusCode::CONFLICT,
        store::StoreError::Sqlite(_) | store::StoreError::Pool(_) | store::StoreError::Serde(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn store_code(e: &store::StoreError) -> &'static str {
    match e {
        store::StoreError::NotFound(_) => "NOT_FOUND",
        store::StoreError::Duplicate { .. } => "DUPLICATE_REPOSITORY",
        store::StoreError::Sqlite(_) => "STORE_SQLITE_ERROR",
        store::StoreError::Pool(_) => "STORE_POOL_ERROR",
        store::StoreError::Serde(_) => "STORE_SERDE_ERROR",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();
        ApiResponse::<()>::error(code, message, Vec::new()).into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
