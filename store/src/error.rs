use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Error taxonomy for this crate, mapped at call sites to the component
/// taxonomy of the design spec's error handling section: `Duplicate` is
/// Integrity, `NotFound` is a caller-visible Validation, everything else is
/// a transient/resource failure a caller may retry.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("repository already imported: {origin_url} @ {branch}")]
    Duplicate { origin_url: String, branch: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
