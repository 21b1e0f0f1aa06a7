use thiserror::Error;

/// Raised by the external store collaborators. Callers degrade gracefully:
/// a failed append is logged and dropped, a failed query is treated as an
/// empty history.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
}

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("could not draw {requested} unique cells from {available} after {attempts} attempts")]
    UniqueDrawExhausted {
        requested: u32,
        available: u32,
        attempts: u32,
    },
}
