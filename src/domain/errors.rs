use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid content hash: expected {expected}, got {actual}")]
    InvalidContentHash { expected: String, actual: String },

    #[error("Invalid blob ID: {0}")]
    InvalidBlobId(String),

    #[error("Unknown wallpaper style: {0}")]
    UnknownWallpaperStyle(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Content must not be empty")]
    EmptyContent,
}
