//! # Groups Routes Module
//!
//! Wires up `/api/groups`. Reads need any valid token, mutations need `admin`.

use crate::auth::guards::{allow_admin, allow_authenticated};
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use delete::delete_group;
use get::{get_group, list_groups};
use post::{add_course, add_student, create_group};
use put::edit_group;
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/groups` route group.
///
/// - `GET    /groups`              → `list_groups`
/// - `POST   /groups`              → `create_group` (admin only)
/// - `POST   /groups/addStudent`   → `add_student` (admin only)
/// - `POST   /groups/addCourse`    → `add_course` (admin only)
/// - `GET    /groups/{group_id}`   → `get_group`
/// - `PUT    /groups/{group_id}`   → `edit_group` (admin only)
/// - `DELETE /groups/{group_id}`   → `delete_group` (admin only)
pub fn groups_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).route_layer(from_fn(allow_authenticated)))
        .route("/", post(create_group).route_layer(from_fn(allow_admin)))
        .route("/addStudent", post(add_student).route_layer(from_fn(allow_admin)))
        .route("/addCourse", post(add_course).route_layer(from_fn(allow_admin)))
        .route("/{group_id}", get(get_group).route_layer(from_fn(allow_authenticated)))
        .route("/{group_id}", put(edit_group).route_layer(from_fn(allow_admin)))
        .route("/{group_id}", delete(delete_group).route_layer(from_fn(allow_admin)))
}
