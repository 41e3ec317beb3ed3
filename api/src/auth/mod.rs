pub mod middleware;
pub mod claims;
pub mod extractors;
pub mod guards;

pub use claims::{Claims, AuthUser};

use chrono::{Duration, Utc};
use db::models::user::Role;
use jsonwebtoken::{encode, EncodingKey, Header};
use util::config;

/// Generates a JWT and its expiry timestamp for a given user.
///
/// The token is signed with HS256 using `JWT_SECRET` and lives for
/// `JWT_DURATION_MINUTES`.
pub fn generate_jwt(
    user_id: &str,
    role: Role,
    username: &str,
    email: &str,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let minutes = i64::try_from(config::jwt_duration_minutes()).unwrap_or(i64::MAX / 60_000);
    let expiry = Utc::now() + Duration::minutes(minutes);

    let claims = Claims {
        sub: user_id.to_owned(),
        role,
        username: username.to_owned(),
        email: email.to_owned(),
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
