//! Public download of stored uploads: `GET /uploads/{section}/{name}`.

use crate::response::{ApiResponse, error_response};
use axum::{
    Json, Router,
    extract::Path,
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use services::file::FileService;
use util::state::AppState;

pub fn uploads_routes() -> Router<AppState> {
    Router::new().route("/{section}/{name}", get(download_upload))
}

/// GET /uploads/{section}/{name}
///
/// Streams back a stored upload with a content type guessed from its extension.
/// No token is required; the locator returned at upload time is the address.
///
/// ### Errors:
/// - 404 Not Found: unknown section or name, or a path segment that would leave the upload area
/// - 500 Internal Server Error: the file exists but could not be read
pub async fn download_upload(Path((section, name)): Path<(String, String)>) -> impl IntoResponse {
    let path = match FileService::resolve_download(&section, &name).await {
        Ok(path) => path,
        Err(e) => return error_response(e),
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot read upload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to read file")),
            )
                .into_response();
        }
    };

    let mime = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    (StatusCode::OK, [(CONTENT_TYPE, mime)], bytes).into_response()
}
