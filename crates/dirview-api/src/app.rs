//! Application builder: wires router, middleware, and state into an Axum app.

use std::path::Path;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
///
/// When `web.assets_dir` is set, unmatched routes are served from it, with
/// `index.html` answering anything that is not a file.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let assets_dir = state.config.web.assets_dir.clone();

    let mut app = build_router(state);

    if let Some(dir) = assets_dir {
        app = app.fallback_service(web_assets(Path::new(&dir)));
    }
    if let Some(cors) = cors {
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

fn web_assets(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}
