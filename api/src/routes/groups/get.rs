use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::group::GroupService;
use util::state::AppState;

/// GET /api/groups
pub async fn list_groups(State(app_state): State<AppState>) -> impl IntoResponse {
    match GroupService::list(app_state.db()).await {
        Ok(groups) => (
            StatusCode::OK,
            Json(ApiResponse::success(groups, "Groups retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/groups/{group_id}
///
/// The group with its students and courses expanded.
pub async fn get_group(
    State(app_state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    match GroupService::get(app_state.db(), &group_id).await {
        Ok(group) => (
            StatusCode::OK,
            Json(ApiResponse::success(group, "Group retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
