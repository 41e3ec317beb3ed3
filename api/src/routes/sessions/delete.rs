use crate::response::{ApiResponse, error_response};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::session::SessionService;
use util::state::AppState;

/// DELETE /api/sessions/{session_id}
///
/// Removes the session together with its roster.
pub async fn delete_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match SessionService::delete(app_state.db(), &session_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::success((), "Session deleted successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
