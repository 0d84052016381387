//! Request authorization against the session store.

use std::sync::Arc;

use tracing::debug;

use crate::error::AuthError;
use crate::session::SessionStore;

/// Turns a presented session token into a user id or a single
/// `Unauthorized` outcome.
#[derive(Debug, Clone)]
pub struct RequestGate {
    store: Arc<SessionStore>,
}

impl RequestGate {
    /// Creates a gate over `store`.
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Authorizes a request carrying `token`.
    ///
    /// A missing token, an unknown one, and an expired one are not told
    /// apart.
    pub fn authorize(&self, token: Option<&str>) -> Result<String, AuthError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            debug!("Request without session cookie");
            return Err(AuthError::Unauthorized);
        };

        self.store.validate_session(token).map_err(|reason| {
            debug!(reason = %reason, "Request rejected");
            AuthError::Unauthorized
        })
    }
}
