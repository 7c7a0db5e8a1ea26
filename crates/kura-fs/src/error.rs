//! Typed errors for filesystem operations.

use std::io;

use kura_glob::PatternError;
use thiserror::Error;

/// Result type for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Filesystem operation errors.
///
/// Everything is raised synchronously at the call that detects it; nothing
/// is retried internally, and partially completed multi-entry operations
/// (tree copies, archive extraction) are not rolled back.
#[derive(Debug, Clone, Error)]
pub enum FsError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    #[error("destination is a file: {0}")]
    DestinationIsFile(String),
    #[error("not a directory: {0}")]
    NotDirectory(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("archive error: {0}")]
    Archive(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        use io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => FsError::NotFound(err.to_string()),
            ErrorKind::PermissionDenied => FsError::PermissionDenied(err.to_string()),
            ErrorKind::NotADirectory => FsError::NotDirectory(err.to_string()),
            _ => FsError::Io(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for FsError {
    fn from(err: zip::result::ZipError) -> Self {
        FsError::Archive(err.to_string())
    }
}
