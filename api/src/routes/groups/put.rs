use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::groups::common::UpdateGroupRequest;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::group::{GroupService, UpdateGroup};
use util::state::AppState;
use validator::Validate;

/// PUT /api/groups/{group_id}
///
/// Partially updates a group. Admin only. A supplied `students` or `courses`
/// list replaces the stored set.
///
/// ### Errors:
/// - 400 Bad Request: Validation failure or invalid references
/// - 404 Not Found
/// - 409 Conflict: another group already has the name
pub async fn edit_group(
    State(app_state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<UpdateGroupRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let params = UpdateGroup {
        name: req.name,
        students: req.students,
        courses: req.courses,
    };

    match GroupService::update(app_state.db(), &group_id, params).await {
        Ok(group) => (
            StatusCode::OK,
            Json(ApiResponse::success(group, "Group updated successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
