use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorIndexError>;

#[derive(Debug, Error)]
pub enum VectorIndexError {
    #[error("[vector-index] embedding provider failed: {0}")]
    Provider(#[from] llm_provider::LlmError),

    #[error("[vector-index] qdrant error: {0}")]
    Qdrant(String),

    #[error("[vector-index] vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
