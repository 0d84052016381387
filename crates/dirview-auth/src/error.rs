//! Typed authentication outcomes.

use thiserror::Error;

use dirview_core::error::AppError;

/// Failures produced by the authentication subsystem.
///
/// `SessionNotFound` and `SessionExpired` are kept apart for the sweeper and
/// tests; anything facing a client goes through [`crate::RequestGate`],
/// which folds both into `Unauthorized`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user or wrong password; the two are not told apart.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// No live session for the token.
    #[error("session not found")]
    SessionNotFound,
    /// The session passed its inactivity or absolute deadline.
    #[error("session expired")]
    SessionExpired,
    /// The request carries no usable session.
    #[error("unauthorized")]
    Unauthorized,
    /// The operating system's secure random source failed.
    #[error("secure random source unavailable: {0}")]
    Entropy(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::unauthorized("Invalid username or password"),
            AuthError::SessionNotFound | AuthError::SessionExpired | AuthError::Unauthorized => {
                AppError::unauthorized("Unauthorized")
            }
            AuthError::Entropy(detail) => {
                AppError::entropy(format!("Secure random source failed: {detail}"))
            }
        }
    }
}
