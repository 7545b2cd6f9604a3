use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::FileId;

/// A per-file parser failure, recorded per §7 ("Semantic" errors: store
/// `parse_error`, skip the file, continue the repo — never retried).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseFailure {
    pub file_id: FileId,
    pub message: String,
}

/// Cross-crate error kinds that don't belong to any one component's own
/// error enum but need a shared vocabulary (e.g. reported in API bodies).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("integrity violation: {0}")]
    Integrity(String),
}
