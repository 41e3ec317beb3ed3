use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::files::common::UpdateFileRequest;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::file::{FileService, UpdateFile};
use util::state::AppState;
use validator::Validate;

/// PUT /api/files/{file_id}
///
/// Edits a file record. Admin only. The stored bytes are not touched.
///
/// ### Request Body (all fields optional)
/// ```json
/// { "filename": "notes.pdf", "filePath": "http://...", "courseId": "665f1c2e9b1d4a0012345678" }
/// ```
///
/// ### Errors:
/// - 400 Bad Request: Validation failure or malformed id
/// - 404 Not Found: the file, or the given course, does not exist
pub async fn edit_file(
    State(app_state): State<AppState>,
    Path(file_id): Path<String>,
    Json(req): Json<UpdateFileRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let params = UpdateFile {
        filename: req.filename,
        file_path: req.file_path,
        course_id: req.course_id,
    };

    match FileService::update(app_state.db(), &file_id, params).await {
        Ok(file) => (
            StatusCode::OK,
            Json(ApiResponse::success(file, "File updated successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
