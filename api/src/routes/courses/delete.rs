use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::course::CourseService;
use util::state::AppState;

/// DELETE /api/courses/{course_id}
///
/// Removes the course. Files, sessions and group links that point at it are
/// kept; `GET /api/system/orphans` reports them.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request`: malformed id
/// - `404 Not Found`
pub async fn delete_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    match CourseService::delete(app_state.db(), &course_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::success((), "Course deleted successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
