use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::group::GroupService;
use util::state::AppState;

/// DELETE /api/groups/{group_id}
///
/// Removes the group. Sessions and course links that reference it are kept.
pub async fn delete_group(
    State(app_state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    match GroupService::delete(app_state.db(), &group_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::success((), "Group deleted successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
