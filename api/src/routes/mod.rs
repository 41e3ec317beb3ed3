//! HTTP route entry point.
//!
//! Everything lives under `/api`, apart from the public upload downloads
//! served at `/uploads`.
//!
//! Route groups include:
//! - `/health` → Health check endpoint (public)
//! - `/users` → Login (public) and user management
//! - `/courses` → Courses, course uploads and progress
//! - `/files` → Stored file records
//! - `/groups` → Groups and their memberships
//! - `/sessions` → Teaching sessions and attendance
//! - `/system` → Maintenance (admin only)

use crate::routes::{
    courses::courses_routes, files::files_routes, groups::groups_routes, health::health_routes,
    sessions::sessions_routes, system::system_routes, uploads::uploads_routes, users::users_routes,
};
use axum::Router;
use util::state::AppState;

pub mod common;
pub mod courses;
pub mod files;
pub mod groups;
pub mod health;
pub mod sessions;
pub mod system;
pub mod uploads;
pub mod users;

/// Builds the `/api` router.
///
/// Access control is applied per route inside each group: reads need any
/// valid token, admin-only and teacher-or-admin mutations are guarded
/// individually, and `/health` plus `/users/login` are public.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/users", users_routes())
        .nest("/courses", courses_routes())
        .nest("/files", files_routes())
        .nest("/groups", groups_routes())
        .nest("/sessions", sessions_routes())
        .nest("/system", system_routes())
        .with_state(app_state)
}

/// The whole HTTP surface: `/api/...` plus `/uploads/...`.
///
/// Request logging and CORS are layered on by the binary.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", routes(app_state.clone()))
        .nest("/uploads", uploads_routes().with_state(app_state))
}
