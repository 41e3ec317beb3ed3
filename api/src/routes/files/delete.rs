use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::file::FileService;
use util::state::AppState;

/// DELETE /api/files/{file_id}
///
/// Removes the file record. Course file sets keep the id until the next
/// orphan purge, and the stored bytes stay on disk.
pub async fn delete_file(
    State(app_state): State<AppState>,
    Path(file_id): Path<String>,
) -> impl IntoResponse {
    match FileService::delete(app_state.db(), &file_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::success((), "File deleted successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
