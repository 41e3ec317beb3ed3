use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::session::SessionService;
use util::state::AppState;

/// GET /api/sessions/{course_id}/{group_id}
///
/// Sessions of one course held for one group, ordered by start time.
pub async fn list_sessions(
    State(app_state): State<AppState>,
    Path((course_id, group_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match SessionService::list_for(app_state.db(), &course_id, &group_id).await {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(sessions, "Sessions retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/sessions/{session_id}
pub async fn get_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match SessionService::get(app_state.db(), &session_id).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(session, "Session retrieved successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
