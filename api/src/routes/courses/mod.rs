//! # Courses Routes Module
//!
//! Wires up the `/api/courses` endpoint group, including course file uploads
//! and progress reporting.
//!
//! ## Access
//! Reads need any valid token. Creating, editing and deleting courses,
//! attaching files and uploading need `admin`.

use crate::auth::guards::{allow_admin, allow_authenticated};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use delete::delete_course;
use get::{get_course, get_course_progress, list_course_files, list_courses};
use post::{add_file, create_course, upload_course_file};
use put::edit_course;
use util::{config, state::AppState};

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Room for multipart boundaries and the `section` field on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Builds the `/courses` route group.
///
/// - `GET    /courses`                       → `list_courses`
/// - `POST   /courses`                       → `create_course` (admin only)
/// - `POST   /courses/addFile`               → `add_file` (admin only)
/// - `GET    /courses/{course_id}`           → `get_course`
/// - `PUT    /courses/{course_id}`           → `edit_course` (admin only)
/// - `DELETE /courses/{course_id}`           → `delete_course` (admin only)
/// - `GET    /courses/{course_id}/progress`  → `get_course_progress`
/// - `GET    /courses/{course_id}/files`     → `list_course_files`
/// - `POST   /courses/{course_id}/files`     → `upload_course_file` (admin only, multipart)
pub fn courses_routes() -> Router<AppState> {
    let upload_limit = config::max_upload_bytes().saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(list_courses).route_layer(from_fn(allow_authenticated)))
        .route("/", post(create_course).route_layer(from_fn(allow_admin)))
        .route("/addFile", post(add_file).route_layer(from_fn(allow_admin)))
        .route("/{course_id}", get(get_course).route_layer(from_fn(allow_authenticated)))
        .route("/{course_id}", put(edit_course).route_layer(from_fn(allow_admin)))
        .route("/{course_id}", delete(delete_course).route_layer(from_fn(allow_admin)))
        .route(
            "/{course_id}/progress",
            get(get_course_progress).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/{course_id}/files",
            get(list_course_files).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/{course_id}/files",
            post(upload_course_file)
                .layer(DefaultBodyLimit::max(upload_limit))
                .route_layer(from_fn(allow_admin)),
        )
}
