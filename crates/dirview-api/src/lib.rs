//! # dirview-api
//!
//! HTTP API layer for DirView built on Axum.
//!
//! Provides the login, logout, and directory listing endpoints, the session
//! cookie extractor, middleware (request logging, CORS, login throttling),
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiResult};
pub use extractors::auth::SESSION_COOKIE;
pub use state::AppState;
