//! Auth handlers: login and logout.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};
use validator::Validate;

use dirview_core::error::AppError;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::auth::SESSION_COOKIE;
use crate::state::AppState;

/// POST /api/login
///
/// Sets `session=<token>` as an HttpOnly, Secure, SameSite=Strict session
/// cookie. Any body problem, including a missing JSON content type, is a 400.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<ApiResponse<LoginResponse>>)> {
    let Json(req) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Malformed login request");
        AppError::validation("Invalid request body")
    })?;
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;

    if let Some(throttle) = &state.login_throttle
        && !throttle.check(&req.username).await
    {
        warn!(username = %req.username, "Login throttled");
        return Err(AppError::rate_limited("Too many login attempts").into());
    }

    let username = req.username.clone();
    let store = state.session_store.clone();
    let token = tokio::task::spawn_blocking(move || {
        store.create_session(&req.username, &req.password)
    })
    .await
    .map_err(|e| AppError::internal(format!("Login task failed: {e}")))??;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/");

    Ok((jar.add(cookie), Json(ApiResponse::ok(LoginResponse { username }))))
}

/// POST /api/logout
///
/// Revokes the presented session, if any, and always answers with a
/// removal cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.session_store.delete_session(cookie.value());
    }

    let mut removal = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .build();
    removal.make_removal();

    (
        jar.add(removal),
        Json(ApiResponse::ok(MessageResponse {
            message: "Logged out successfully".to_string(),
        })),
    )
}
