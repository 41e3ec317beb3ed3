use axum::{Router, routing::get, Json, extract::State, http::StatusCode, response::IntoResponse};
use crate::response::ApiResponse;
use util::state::AppState;

/// Builds the `/health` route group.
///
/// A single public `GET /health` endpoint for uptime checks and load balancers.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Reports whether the API is running and its database answers.
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": "OK",
///   "message": "Health check passed"
/// }
/// ```
/// - `503 Service Unavailable` when the database cannot be reached
async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success("OK", "Health check passed")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::success("DOWN", "Database unavailable")),
            )
        }
    }
}
