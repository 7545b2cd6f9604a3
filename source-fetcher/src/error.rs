use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// `FetchError::Archive`/`BranchNotFound` are Validation errors (§7,
/// surfaced synchronously); `Git`/`Io` are typically Transient and retried
/// by the job scheduler's backoff policy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error("archive entry rejected: {0}")]
    UnsafeArchiveEntry(String),

    #[error("uncompressed size {actual} exceeds cap {cap}")]
    SizeCapExceeded { actual: u64, cap: u64 },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
