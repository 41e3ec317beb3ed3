use crate::response::{ApiResponse, error_response};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use services::cleanup;
use util::state::AppState;

/// GET /api/system/orphans
///
/// Lists files and sessions whose course is gone, sessions whose group is
/// gone, and membership links pointing at deleted records. Nothing is changed.
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "data": {
///     "filesWithoutCourse": [],
///     "sessionsWithoutCourse": ["665f1c2e9b1d4a00123456dd"],
///     "sessionsWithoutGroup": [],
///     "danglingEdges": [
///       { "field": "course.files", "ownerId": "665f...", "targetId": "665f..." }
///     ]
///   },
///   "message": "Orphan report generated"
/// }
/// ```
pub async fn get_orphans(State(app_state): State<AppState>) -> impl IntoResponse {
    match cleanup::find_orphans(app_state.db()).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report, "Orphan report generated")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
