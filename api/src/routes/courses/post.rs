//! # Course Creation Routes
//!
//! - `POST /api/courses`: Create a course
//! - `POST /api/courses/addFile`: Attach an existing file to a course
//! - `POST /api/courses/{course_id}/files`: Upload a file for a course
//!
//! All routes require admin privileges.

use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::courses::common::{AddFileRequest, CreateCourseRequest};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::course::{CourseService, CreateCourse};
use services::file::{FileService, UploadFile, UploadPolicy};
use util::state::AppState;
use validator::Validate;

/// POST /api/courses
///
/// Creates a course taught by an existing teacher.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Linear Algebra",
///   "teacherId": "665f1c2e9b1d4a0012345678",
///   "files": ["665f1c2e9b1d4a00123456aa"],
///   "groups": ["665f1c2e9b1d4a00123456bb"],
///   "totalDuration": 10
/// }
/// ```
/// `teacher` is accepted as an alias of `teacherId`. `files` and `groups` are optional.
///
/// ### Response: 201 Created
/// - The course with its teacher, files and groups expanded
///
/// ### Errors:
/// - 400 Bad Request: Validation failure, malformed id, unknown references,
///   or a teacher id that does not belong to a teacher
pub async fn create_course(
    State(app_state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let params = CreateCourse {
        name: req.name,
        teacher_id: req.teacher_id,
        files: req.files,
        groups: req.groups,
        total_duration: req.total_duration,
    };

    match CourseService::create(app_state.db(), params).await {
        Ok(course) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(course, "Course created successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/courses/addFile
///
/// Adds an existing file to the course's file set. Adding a file twice is a no-op.
///
/// ### Request Body
/// ```json
/// { "courseId": "665f1c2e9b1d4a0012345678", "fileId": "665f1c2e9b1d4a00123456aa" }
/// ```
///
/// ### Errors:
/// - 400 Bad Request: malformed id
/// - 404 Not Found: course or file does not exist
pub async fn add_file(
    State(app_state): State<AppState>,
    Json(req): Json<AddFileRequest>,
) -> impl IntoResponse {
    match CourseService::add_file(app_state.db(), &req.course_id, &req.file_id).await {
        Ok(course) => (
            StatusCode::OK,
            Json(ApiResponse::success(course, "File added to course successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

fn bad_upload(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(message))).into_response()
}

/// POST /api/courses/{course_id}/files
///
/// Uploads one file for a course.
///
/// ### Request Body (Multipart Form Data)
/// - `file` (file, required): at most `MAX_UPLOAD_BYTES`, with an allowed extension
/// - `section` (string, optional): storage section, `general` when omitted
///
/// The stored file is served from `GET /uploads/{section}/{name}`; its
/// locator is returned as `filePath`. The course's own file set is left
/// unchanged; use `POST /api/courses/addFile` to attach it.
///
/// ### Responses
/// - `201 Created`: the stored file record
/// - `400 Bad Request`: missing file, size over the ceiling, extension not allowed
/// - `404 Not Found`: the course does not exist
pub async fn upload_course_file(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut section: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return bad_upload(format!("Invalid multipart body: {e}")),
        };

        let name = field.name().unwrap_or("").to_owned();
        match name.as_str() {
            "section" => match field.text().await {
                Ok(text) => section = Some(text),
                Err(e) => return bad_upload(format!("Invalid section field: {e}")),
            },
            "file" => {
                if file_bytes.is_some() {
                    return bad_upload("Only one file may be uploaded per request");
                }
                file_name = field.file_name().map(|s| s.to_string());
                match field.bytes().await {
                    Ok(bytes) => file_bytes = Some(bytes.to_vec()),
                    Err(e) => return bad_upload(format!("Could not read file: {e}")),
                }
            }
            _ => continue,
        }
    }

    let (Some(original_name), Some(bytes)) = (file_name, file_bytes) else {
        return bad_upload("File is required");
    };

    let params = UploadFile {
        course_id,
        section,
        original_name,
        bytes,
    };

    match FileService::upload(app_state.db(), &UploadPolicy::from_config(), params).await {
        Ok(file) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(file, "File uploaded successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
