use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("store error: {0}")]
    Store(#[from] store::StoreError),
}

pub type Result<T> = std::result::Result<T, GateError>;
