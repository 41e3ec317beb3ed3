use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::user::UserService;
use util::state::AppState;

/// DELETE /api/users/{user_id}
///
/// Removes a user. Admin only. References held by courses, groups and
/// session rosters are left untouched.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": null, "message": "User deleted successfully" }
/// ```
/// - `400 Bad Request`: malformed id
/// - `404 Not Found`
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    match UserService::delete(app_state.db(), &user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::success((), "User deleted successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
