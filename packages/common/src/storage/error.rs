use thiserror::Error;

/// Errors from blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid content hash: {0}")]
    InvalidHash(String),

    #[error("blob exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
