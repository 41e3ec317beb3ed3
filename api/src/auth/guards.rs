//! Route guards built on the `AuthUser` extractor.
//!
//! Each guard inserts the verified `AuthUser` into the request extensions so
//! handlers can read it with `Extension<AuthUser>`.

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::Role;

#[derive(serde::Serialize, Default)]
pub struct Empty;

type GuardRejection = (StatusCode, Json<ApiResponse<Empty>>);

/// Helper to extract, validate user from request extensions and insert the back into the request
async fn extract_and_insert_authuser(
    mut req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), GuardRejection> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Lets the request through when the caller holds one of `roles`.
async fn allow_roles(
    req: Request<Body>,
    next: Next,
    roles: &[Role],
    failure_msg: &str,
) -> Result<Response, GuardRejection> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !roles.contains(&user.0.role) {
        tracing::debug!(user = %user.0.sub, role = %user.0.role, "access denied");
        return Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(failure_msg))));
    }

    Ok(next.run(req).await)
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    allow_roles(req, next, &[Role::Admin], "Admin access required").await
}

/// Teachers and admins.
pub async fn allow_teacher_or_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    allow_roles(
        req,
        next,
        &[Role::Teacher, Role::Admin],
        "Teacher or admin access required",
    )
    .await
}
