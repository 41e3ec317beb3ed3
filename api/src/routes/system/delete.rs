use crate::response::{ApiResponse, error_response};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use services::cleanup::{self, OrphanReport, PurgeSummary};
use util::state::AppState;

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub report: OrphanReport,
    pub deleted: PurgeSummary,
}

/// DELETE /api/system/orphans
///
/// Deletes the records listed by `GET /api/system/orphans` in one
/// transaction and returns both the report and the deletion counts.
pub async fn purge_orphans(State(app_state): State<AppState>) -> impl IntoResponse {
    match cleanup::purge_orphans(app_state.db()).await {
        Ok((report, deleted)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                PurgeResponse { report, deleted },
                "Orphaned records purged",
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
