//! # Files Routes Module
//!
//! Wires up `/api/files`. Uploads live under `/api/courses/{course_id}/files`.

use crate::auth::guards::{allow_admin, allow_authenticated};
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, put},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod put;

/// Builds the `/files` route group.
///
/// - `GET    /files`            → `list_files`
/// - `GET    /files/{file_id}`  → `get_file`
/// - `PUT    /files/{file_id}`  → `edit_file` (admin only)
/// - `DELETE /files/{file_id}`  → `delete_file` (admin only)
pub fn files_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_files).route_layer(from_fn(allow_authenticated)))
        .route("/{file_id}", get(get::get_file).route_layer(from_fn(allow_authenticated)))
        .route("/{file_id}", put(put::edit_file).route_layer(from_fn(allow_admin)))
        .route("/{file_id}", delete(delete::delete_file).route_layer(from_fn(allow_admin)))
}
