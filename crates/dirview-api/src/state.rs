//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use dirview_auth::{RequestGate, SessionStore};
use dirview_core::config::AppConfig;
use dirview_storage::SecurePathResolver;

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Live sessions and the user registry
    pub session_store: Arc<SessionStore>,
    /// Cookie-to-user authorization
    pub gate: RequestGate,
    /// Root-confined path resolution
    pub resolver: Arc<SecurePathResolver>,
    /// Login attempt throttle, when enabled
    pub login_throttle: Option<RateLimiter>,
}

impl AppState {
    /// Wires the state from its owned parts.
    pub fn new(
        config: AppConfig,
        session_store: Arc<SessionStore>,
        resolver: SecurePathResolver,
    ) -> Self {
        let throttle = &config.auth.login_throttle;
        let login_throttle = throttle
            .enabled
            .then(|| RateLimiter::new(throttle.burst, throttle.refill_per_second));

        Self {
            gate: RequestGate::new(Arc::clone(&session_store)),
            config: Arc::new(config),
            session_store,
            resolver: Arc::new(resolver),
            login_throttle,
        }
    }
}
