//! # User Creation and Login Routes
//!
//! - `POST /api/users/login`: Exchange credentials for an access token (public)
//! - `POST /api/users`: Create a user (admin only)

use crate::auth::generate_jwt;
use crate::response::{ApiResponse, error_response, validation_response};
use crate::routes::common::parse_role;
use crate::routes::users::common::{CreateUserRequest, LoginRequest, LoginResponse};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use services::user::{CreateUser, UserService};
use services::views::UserView;
use util::state::AppState;
use validator::Validate;

/// POST /api/users/login
///
/// Verifies the email/password pair and issues a signed token.
///
/// ### Request Body
/// ```json
/// { "email": "alice@example.com", "password": "secret1" }
/// ```
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOi...",
///     "expiresAt": "2025-05-30T10:00:00+00:00",
///     "user": { "id": "665f1c2e9b1d4a0012345678", "username": "alice", "role": "student", ... }
///   },
///   "message": "Login successful"
/// }
/// ```
///
/// ### Errors:
/// - 400 Bad Request: Validation failure
/// - 401 Unauthorized: Unknown email or wrong password
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let user = match UserService::verify_credentials(app_state.db(), &req.email, &req.password).await {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    match generate_jwt(&user.id, user.role, &user.username, &user.email) {
        Ok((token, expires_at)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                LoginResponse {
                    token,
                    expires_at,
                    user: Some(UserView::from(user)),
                },
                "Login successful",
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token signing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<LoginResponse>::error("Could not issue token")),
            )
                .into_response()
        }
    }
}

/// POST /api/users
///
/// Creates a user. Admin-only access.
///
/// ### Request Body
/// ```json
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "secret1",
///   "role": "teacher"
/// }
/// ```
/// `role` defaults to `student`.
///
/// ### Response: 201 Created
/// - The stored user (without the password hash)
///
/// ### Errors:
/// - 400 Bad Request: Validation failure
/// - 409 Conflict: Duplicate username/email
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    let role = match parse_role(&req.role) {
        Ok(role) => role,
        Err(e) => return error_response(e),
    };

    match UserService::create(
        app_state.db(),
        CreateUser {
            username: req.username,
            email: req.email,
            password: req.password,
            role,
        },
    )
    .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(user, "User created successfully")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
