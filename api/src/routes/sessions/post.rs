//! # Session Creation and Attendance Routes
//!
//! - `POST /api/sessions`
//! - `POST /api/sessions/markAttendance`
//!
//! Both routes require the `teacher` or `admin` role.

use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::sessions::common::{CreateSessionRequest, MarkAttendanceRequest};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use services::session::SessionService;
use util::state::AppState;
use validator::Validate;

/// POST /api/sessions
///
/// Records a teaching session for a course and group, with its roster.
///
/// ### Request Body
/// ```json
/// {
///   "courseId": "665f1c2e9b1d4a00123456cc",
///   "groupId": "665f1c2e9b1d4a00123456bb",
///   "date": "2024-03-01",
///   "startTime": "09:00",
///   "endTime": "11:00",
///   "attendance": [{ "studentId": "665f1c2e9b1d4a0012345678", "isPresent": true }]
/// }
/// ```
/// `startTime` and `endTime` accept `HH:MM` on `date` or a full RFC 3339 instant.
///
/// ### Response: 201 Created
/// - The session with `sessionTime` in minutes, `duration` in hours and the roster expanded
///
/// ### Errors:
/// - 400 Bad Request: Validation failure, end not after start, malformed or
///   unknown roster ids, roster ids that are not students
/// - 404 Not Found: course or group does not exist
pub async fn create_session(
    State(app_state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let params = match req.into_params() {
        Ok(params) => params,
        Err(e) => return error_response(e),
    };

    match SessionService::create(app_state.db(), params).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(session, "Session created successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/sessions/markAttendance
///
/// Sets the presence flag of a student already on the session roster.
///
/// ### Request Body
/// ```json
/// {
///   "sessionId": "665f1c2e9b1d4a00123456dd",
///   "studentId": "665f1c2e9b1d4a0012345678",
///   "isPresent": false
/// }
/// ```
///
/// ### Errors:
/// - 400 Bad Request: malformed id, or the user is not a student
/// - 404 Not Found: session or student does not exist, or the student is not on the roster
pub async fn mark_attendance(
    State(app_state): State<AppState>,
    Json(req): Json<MarkAttendanceRequest>,
) -> impl IntoResponse {
    match SessionService::mark_attendance(
        app_state.db(),
        &req.session_id,
        &req.student_id,
        req.is_present,
    )
    .await
    {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(session, "Attendance marked successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
