//! # Group Creation and Membership Routes
//!
//! - `POST /api/groups`
//! - `POST /api/groups/addStudent`
//! - `POST /api/groups/addCourse`
//!
//! All routes require admin privileges. Membership additions are idempotent.

use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::groups::common::{AddCourseRequest, AddStudentRequest, CreateGroupRequest};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use services::group::{CreateGroup, GroupService};
use util::state::AppState;
use validator::Validate;

/// POST /api/groups
///
/// ### Request Body
/// ```json
/// {
///   "name": "Group A",
///   "students": ["665f1c2e9b1d4a0012345678"],
///   "courses": ["665f1c2e9b1d4a00123456bb"]
/// }
/// ```
///
/// ### Errors:
/// - 400 Bad Request: blank name, malformed id, unknown references, or a
///   student id that does not belong to a student
/// - 409 Conflict: a group with this name exists
pub async fn create_group(
    State(app_state): State<AppState>,
    Json(req): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let params = CreateGroup {
        name: req.name,
        students: req.students,
        courses: req.courses,
    };

    match GroupService::create(app_state.db(), params).await {
        Ok(group) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(group, "Group created successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/groups/addStudent
///
/// ### Request Body
/// ```json
/// { "groupId": "665f1c2e9b1d4a00123456bb", "studentId": "665f1c2e9b1d4a0012345678" }
/// ```
///
/// ### Errors:
/// - 400 Bad Request: malformed id, or the user is not a student
/// - 404 Not Found: group or user does not exist
pub async fn add_student(
    State(app_state): State<AppState>,
    Json(req): Json<AddStudentRequest>,
) -> impl IntoResponse {
    match GroupService::add_student(app_state.db(), &req.group_id, &req.student_id).await {
        Ok(group) => (
            StatusCode::OK,
            Json(ApiResponse::success(group, "Student added to group successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/groups/addCourse
///
/// ### Request Body
/// ```json
/// { "groupId": "665f1c2e9b1d4a00123456bb", "courseId": "665f1c2e9b1d4a00123456cc" }
/// ```
///
/// The link is shared: the course lists the group afterwards as well.
pub async fn add_course(
    State(app_state): State<AppState>,
    Json(req): Json<AddCourseRequest>,
) -> impl IntoResponse {
    match GroupService::add_course(app_state.db(), &req.group_id, &req.course_id).await {
        Ok(group) => (
            StatusCode::OK,
            Json(ApiResponse::success(group, "Course added to group successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
