//! Failure kinds surfaced by every service operation.

use db::object_id::InvalidObjectId;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid {field} reference: '{value}' is not a valid identifier")]
    InvalidReferenceFormat { field: String, value: String },

    #[error("Missing {collection} references: expected {expected}, found {found} (missing: {})", missing.join(", "))]
    MissingReferences {
        collection: &'static str,
        expected: usize,
        found: usize,
        missing: Vec<String>,
    },

    #[error("Invalid {field}: {} must be {expected}", ids.join(", "))]
    InvalidRole {
        field: String,
        expected: String,
        ids: Vec<String>,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Student {student_id} is not on the roster of session {session_id}")]
    AttendanceRecordNotFound {
        session_id: String,
        student_id: String,
    },

    #[error("Invalid time range: end time must be after start time")]
    InvalidTimeRange,

    #[error("Course {0} has no positive total duration")]
    InvalidCourseDuration(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_format(field: &str, err: InvalidObjectId) -> Self {
        AppError::InvalidReferenceFormat {
            field: field.to_owned(),
            value: err.0,
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return AppError::Conflict(conflict_message(&detail));
        }
        match err {
            DbErr::RecordNotFound(what) => AppError::NotFound(what),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Turns `UNIQUE constraint failed: users.email` into a readable message.
fn conflict_message(detail: &str) -> String {
    match detail.rsplit_once('.') {
        Some((_, column)) => {
            let column = column.split_whitespace().next().unwrap_or(column);
            format!("A record with this {column} already exists")
        }
        None => "A record with these values already exists".to_string(),
    }
}
