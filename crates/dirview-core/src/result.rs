//! Convenience result type alias for DirView.

use crate::error::AppError;

/// A specialized `Result` type for DirView operations.
pub type AppResult<T> = Result<T, AppError>;
