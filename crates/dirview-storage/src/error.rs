//! Path policy failures.

use thiserror::Error;

use dirview_core::error::AppError;

/// Why a requested path was refused.
///
/// Messages are fixed strings: they never include the resolved location.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Too long, disallowed characters, or unresolvable.
    #[error("invalid path")]
    BadPath,
    /// The path leaves the root, lexically or through a symlink.
    #[error("path traversal attempt detected")]
    Traversal,
}

impl From<PathError> for AppError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::BadPath => AppError::validation("Invalid path"),
            PathError::Traversal => AppError::validation("Path traversal attempt detected"),
        }
    }
}
