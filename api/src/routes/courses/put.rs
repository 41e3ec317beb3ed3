use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::courses::common::UpdateCourseRequest;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::course::{CourseService, UpdateCourse};
use util::state::AppState;
use validator::Validate;

/// PUT /api/courses/{course_id}
///
/// Partially updates a course. Admin only.
///
/// ### Request Body (all fields optional)
/// ```json
/// {
///   "name": "Linear Algebra II",
///   "teacherId": "665f1c2e9b1d4a0012345678",
///   "files": [],
///   "groups": ["665f1c2e9b1d4a00123456bb"],
///   "totalDuration": 12
/// }
/// ```
/// A supplied `files` or `groups` list replaces the stored set.
///
/// ### Errors:
/// - 400 Bad Request: Validation failure or invalid references
/// - 404 Not Found
pub async fn edit_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let params = UpdateCourse {
        name: req.name,
        teacher_id: req.teacher_id,
        files: req.files,
        groups: req.groups,
        total_duration: req.total_duration,
    };

    match CourseService::update(app_state.db(), &course_id, params).await {
        Ok(course) => (
            StatusCode::OK,
            Json(ApiResponse::success(course, "Course updated successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
