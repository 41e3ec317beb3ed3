use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::common::parse_role;
use crate::routes::users::common::UpdateUserRequest;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::user::{UpdateUser, UserService};
use util::state::AppState;
use validator::Validate;

/// PUT /api/users/{user_id}
///
/// Partially updates a user. Admin only.
///
/// ### Request Body (all fields optional)
/// ```json
/// {
///   "username": "alice2",
///   "email": "alice2@example.com",
///   "password": "newpass1",
///   "role": "teacher"
/// }
/// ```
///
/// A role change reclassifies the user. Courses, groups and rosters that
/// referenced the user under the old role are kept as they are.
///
/// ### Errors:
/// - 400 Bad Request: Validation failure or malformed id
/// - 404 Not Found
/// - 409 Conflict: Username/email taken by another user
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let role = match req.role.as_deref().map(parse_role).transpose() {
        Ok(role) => role,
        Err(e) => return error_response(e),
    };

    let params = UpdateUser {
        username: req.username,
        email: req.email,
        password: req.password,
        role,
    };

    match UserService::update(app_state.db(), &user_id, params).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user, "User updated successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
