use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by identity store operations.
#[derive(Debug, Error)]
pub enum KeyswapError {
    #[error("failed to read directory {}: {source}", path.display())]
    UnreadableDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("folder does not exist: {}", .0.display())]
    MissingFolder(PathBuf),

    #[error("{} is not a regular file", .0.display())]
    NotRegularFile(PathBuf),

    #[error("key generation failed: {0}")]
    Keygen(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type KeyswapResult<T> = Result<T, KeyswapError>;
