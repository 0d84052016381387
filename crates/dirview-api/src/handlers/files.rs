//! Directory listing handlers.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use tracing::debug;

use dirview_core::error::AppError;
use dirview_storage::{FileInfo, read_listing};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/files and /api/files/
pub async fn list_root(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FileInfo>>> {
    list(&state, &user, "/").await
}

/// GET /api/files/{*path}
///
/// The capture arrives percent-decoded, so an encoded space or `$` is
/// rejected by path validation like a literal one.
pub async fn list_path(
    user: AuthUser,
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<FileInfo>>> {
    let Path(path) = path.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Undecodable request path");
        AppError::validation("Invalid path")
    })?;

    list(&state, &user, &format!("/{path}")).await
}

async fn list(
    state: &AppState,
    user: &AuthUser,
    raw: &str,
) -> ApiResult<Json<ApiResponse<FileInfo>>> {
    let resolved = state.resolver.resolve(raw)?;
    debug!(username = %user.user_id, path = raw, "Listing path");

    let info = read_listing(&resolved).await?;
    Ok(Json(ApiResponse::ok(info)))
}
