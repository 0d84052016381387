//! `AuthUser` extractor: reads the session cookie and runs it through the
//! request gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Authenticated caller, available in protected handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Username the session belongs to.
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).map(|c| c.value());

        let user_id = state.gate.authorize(token)?;
        Ok(Self { user_id })
    }
}
