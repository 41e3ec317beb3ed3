//! # Users Routes Module
//!
//! Wires up the `/api/users` endpoint group.
//!
//! ## Structure
//! - `post.rs`: login and user creation
//! - `get.rs`: list, fetch and list-by-role
//! - `put.rs`: partial update
//! - `delete.rs`: removal
//!
//! ## Access
//! `POST /users/login` is public. Reads need any valid token, mutations need `admin`.

use crate::auth::guards::{allow_admin, allow_authenticated};
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use delete::delete_user;
use get::{get_user, list_users, list_users_by_role};
use post::{create_user, login};
use put::update_user;
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/users` route group.
///
/// - `POST   /users/login`        → `login` (public)
/// - `GET    /users`              → `list_users`
/// - `POST   /users`              → `create_user` (admin only)
/// - `GET    /users/role/{role}`  → `list_users_by_role`
/// - `GET    /users/{user_id}`    → `get_user`
/// - `PUT    /users/{user_id}`    → `update_user` (admin only)
/// - `DELETE /users/{user_id}`    → `delete_user` (admin only)
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/", get(list_users).route_layer(from_fn(allow_authenticated)))
        .route("/", post(create_user).route_layer(from_fn(allow_admin)))
        .route("/role/{role}", get(list_users_by_role).route_layer(from_fn(allow_authenticated)))
        .route("/{user_id}", get(get_user).route_layer(from_fn(allow_authenticated)))
        .route("/{user_id}", put(update_user).route_layer(from_fn(allow_admin)))
        .route("/{user_id}", delete(delete_user).route_layer(from_fn(allow_admin)))
}
