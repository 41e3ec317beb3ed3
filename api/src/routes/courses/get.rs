//! # Course Read Routes
//!
//! - `GET /api/courses`
//! - `GET /api/courses/{course_id}`
//! - `GET /api/courses/{course_id}/progress`
//! - `GET /api/courses/{course_id}/files`

use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::course::CourseService;
use services::file::FileService;
use util::state::AppState;

/// GET /api/courses
///
/// Lists every course with teacher, files and groups expanded.
pub async fn list_courses(State(app_state): State<AppState>) -> impl IntoResponse {
    match CourseService::list(app_state.db()).await {
        Ok(courses) => (
            StatusCode::OK,
            Json(ApiResponse::success(courses, "Courses retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/courses/{course_id}
///
/// ### Errors:
/// - 400 Bad Request: malformed id
/// - 404 Not Found
pub async fn get_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    match CourseService::get(app_state.db(), &course_id).await {
        Ok(course) => (
            StatusCode::OK,
            Json(ApiResponse::success(course, "Course retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/courses/{course_id}/progress
///
/// Share of the course's planned hours already covered by sessions, across all groups.
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "data": { "courseId": "665f1c2e9b1d4a0012345678", "progress": "50.00%" },
///   "message": "Course progress retrieved successfully"
/// }
/// ```
///
/// ### Errors:
/// - 404 Not Found
/// - 422 Unprocessable Entity: the course has no positive total duration
pub async fn get_course_progress(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    match CourseService::progress(app_state.db(), &course_id).await {
        Ok(progress) => (
            StatusCode::OK,
            Json(ApiResponse::success(progress, "Course progress retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/courses/{course_id}/files
///
/// Files uploaded for the course.
///
/// ### Errors:
/// - 404 Not Found: no file belongs to the course
pub async fn list_course_files(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    match FileService::list_by_course(app_state.db(), &course_id).await {
        Ok(files) => (
            StatusCode::OK,
            Json(ApiResponse::success(files, "Files retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
