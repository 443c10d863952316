use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefSyncError {
    #[error("Library unavailable: {0}")]
    LibraryUnavailable(String),

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to generate rustdoc JSON: {0}")]
    RustdocJsonError(String),

    #[error("Invalid version: {0} (expected e.g. 0.7 or 1.2.3)")]
    InvalidVersion(String),
}

pub type Result<T> = std::result::Result<T, RefSyncError>;
