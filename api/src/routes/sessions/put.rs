use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::sessions::common::UpdateSessionRequest;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::session::SessionService;
use util::state::AppState;
use validator::Validate;

/// PUT /api/sessions/{session_id}
///
/// Edits the bounds and/or roster of a session. `sessionTime` is recomputed
/// whenever either bound is given; a supplied `attendance` list replaces the roster.
///
/// ### Request Body (all fields optional)
/// ```json
/// { "startTime": "10:00", "endTime": "12:00", "attendance": [] }
/// ```
///
/// ### Errors:
/// - 400 Bad Request: unparseable time, end not after start, invalid roster
/// - 404 Not Found
pub async fn edit_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let params = match req.into_params() {
        Ok(params) => params,
        Err(e) => return error_response(e),
    };

    match SessionService::update(app_state.db(), &session_id, params).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(session, "Session updated successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
