use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// A parser failure for one file — recorded per §7 (Semantic error: store
/// `parse_error`, skip the file, continue the repo).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("grammar rejected source: {0}")]
    GrammarError(String),

    #[error("source is not valid UTF-8")]
    InvalidEncoding,
}
