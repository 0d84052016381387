//! CORS layer configuration.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use dirview_core::config::CorsConfig;

/// Builds a CORS layer, or `None` when no origins are configured and the
/// server stays same-origin only.
///
/// `"*"` allows any origin without credentials. Explicit origins are
/// allowed to send the session cookie.
pub fn build_cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if config.allowed_origins.is_empty() {
        return None;
    }

    let mut layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age_seconds));

    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins).allow_credentials(true);
    }

    Some(layer)
}
