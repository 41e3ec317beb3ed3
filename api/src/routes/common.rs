//! Field rules shared by the request bodies of several route groups.

use db::models::user::Role;
use once_cell::sync::Lazy;
use regex::Regex;
use services::AppError;
use std::str::FromStr;
use validator::ValidationError;

pub static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[A-Za-z0-9]{3,}$").unwrap_or_else(|e| panic!("username pattern: {e}"))
});

/// At least one letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength")
            .with_message("Password must contain at least one letter and one number".into()))
    }
}

pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    Role::from_str(role).map(|_| ()).map_err(|_| {
        ValidationError::new("role")
            .with_message("Role must be one of student, teacher or admin".into())
    })
}

/// Rejects names made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Name must not be empty".into()))
    } else {
        Ok(())
    }
}

pub fn parse_role(role: &str) -> Result<Role, AppError> {
    Role::from_str(role).map_err(|_| AppError::Validation(format!("Unknown role '{role}'")))
}
