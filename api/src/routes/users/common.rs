use crate::routes::common::{USERNAME_REGEX, validate_password_strength, validate_role};
use serde::{Deserialize, Serialize};
use services::views::UserView;
use validator::Validate;

fn default_role() -> String {
    "student".into()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username must be at least 3 letters or digits"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,

    #[serde(default = "default_role")]
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username must be at least 3 letters or digits"
    ))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: Option<String>,

    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: Option<UserView>,
}
