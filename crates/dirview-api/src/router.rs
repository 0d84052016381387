//! Route definitions for the DirView HTTP API.
//!
//! All routes are mounted under `/api`. A route hit with the wrong method
//! answers 405.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router and thread `state` through every route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(file_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Auth endpoints: login, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
}

/// Directory listing. A wildcard never matches an empty tail, so the root
/// forms are routed separately.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::files::list_root))
        .route("/files/", get(handlers::files::list_root))
        .route("/files/{*path}", get(handlers::files::list_path))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
