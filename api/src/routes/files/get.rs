use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::file::FileService;
use util::state::AppState;

/// GET /api/files
///
/// Lists every stored file record.
pub async fn list_files(State(app_state): State<AppState>) -> impl IntoResponse {
    match FileService::list(app_state.db()).await {
        Ok(files) => (
            StatusCode::OK,
            Json(ApiResponse::success(files, "Files retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/files/{file_id}
///
/// ### Errors:
/// - 400 Bad Request: malformed id
/// - 404 Not Found
pub async fn get_file(
    State(app_state): State<AppState>,
    Path(file_id): Path<String>,
) -> impl IntoResponse {
    match FileService::get(app_state.db(), &file_id).await {
        Ok(file) => (
            StatusCode::OK,
            Json(ApiResponse::success(file, "File retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
