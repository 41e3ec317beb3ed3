//! # User Read Routes
//!
//! - `GET /api/users`
//! - `GET /api/users/{user_id}`
//! - `GET /api/users/role/{role}`

use crate::response::{ApiResponse, error_response};
use crate::routes::common::parse_role;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::user::UserService;
use util::state::AppState;

/// GET /api/users
///
/// Lists every user, oldest first.
///
/// ### Response: 200 OK
/// - `data`: array of users
pub async fn list_users(State(app_state): State<AppState>) -> impl IntoResponse {
    match UserService::list(app_state.db()).await {
        Ok(users) => (
            StatusCode::OK,
            Json(ApiResponse::success(users, "Users retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/users/{user_id}
///
/// ### Errors:
/// - 400 Bad Request: `user_id` is not a 24-character hex identifier
/// - 404 Not Found
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    match UserService::get(app_state.db(), &user_id).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user, "User retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/users/role/{role}
///
/// Lists the users holding `role` (`student`, `teacher` or `admin`).
///
/// ### Errors:
/// - 400 Bad Request: Unknown role
pub async fn list_users_by_role(
    State(app_state): State<AppState>,
    Path(role): Path<String>,
) -> impl IntoResponse {
    let role = match parse_role(&role) {
        Ok(role) => role,
        Err(e) => return error_response(e),
    };

    match UserService::list_by_role(app_state.db(), role).await {
        Ok(users) => (
            StatusCode::OK,
            Json(ApiResponse::success(users, format!("Users with role {role} retrieved successfully"))),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
