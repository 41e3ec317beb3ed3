//! # System Routes Module
//!
//! Maintenance endpoints under `/api/system`. Admin only.

use axum::{Router, middleware::from_fn, routing::get};
use util::state::AppState;

use crate::auth::guards::allow_admin;

pub mod delete;
pub mod get;

/// - `GET    /system/orphans` → report records whose references no longer resolve
/// - `DELETE /system/orphans` → delete exactly what the report lists
pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/orphans", get(get::get_orphans).delete(delete::purge_orphans))
        .route_layer(from_fn(allow_admin))
}
