//! # Sessions Routes Module
//!
//! Wires up `/api/sessions`: teaching sessions and their attendance rosters.
//!
//! ## Access
//! Reads need any valid token. Creating, editing and deleting sessions and
//! marking attendance need `teacher` or `admin`.

use crate::auth::guards::{allow_authenticated, allow_teacher_or_admin};
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use delete::delete_session;
use get::{get_session, list_sessions};
use post::{create_session, mark_attendance};
use put::edit_session;
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/sessions` route group.
///
/// - `POST   /sessions`                         → `create_session`
/// - `POST   /sessions/markAttendance`          → `mark_attendance`
/// - `GET    /sessions/{id}/{group_id}`  → `list_sessions` (`id` is the course id)
/// - `GET    /sessions/{id}`             → `get_session`
/// - `PUT    /sessions/{id}`             → `edit_session`
/// - `DELETE /sessions/{id}`             → `delete_session`
///
/// Both shapes share the first parameter name so the router can tell them apart
/// by segment count.
pub fn sessions_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session).route_layer(from_fn(allow_teacher_or_admin)))
        .route(
            "/markAttendance",
            post(mark_attendance).route_layer(from_fn(allow_teacher_or_admin)),
        )
        .route(
            "/{id}/{group_id}",
            get(list_sessions).route_layer(from_fn(allow_authenticated)),
        )
        .route("/{id}", get(get_session).route_layer(from_fn(allow_authenticated)))
        .route("/{id}", put(edit_session).route_layer(from_fn(allow_teacher_or_admin)))
        .route(
            "/{id}",
            delete(delete_session).route_layer(from_fn(allow_teacher_or_admin)),
        )
}
