use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::AppError;
use validator::ValidationErrors;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// This struct enforces a consistent response structure across all endpoints:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// - `T` is the type of the `data` payload.
/// - `success` is a boolean indicating operation status.
/// - `message` provides a human-readable context string.
///
/// ## Example (success):
/// ```json
/// {
///   "success": true,
///   "data": { "id": "665f1c2e9b1d4a0012345678", "name": "Alice" },
///   "message": "User fetched successfully"
/// }
/// ```
///
/// ## Example (error):
/// ```json
/// {
///   "success": false,
///   "data": {},
///   "message": "User not found"
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    ///
    /// # Arguments
    /// - `data`: The result payload.
    /// - `message`: A descriptive message to accompany the success.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    ///
    /// # Arguments
    /// - `message`: A description of the error.
    ///
    /// # Requires
    /// - `T` must implement `Default`, since error responses do not include useful data.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// HTTP status for each service failure kind.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::NotFound(_) | AppError::AttendanceRecordNotFound { .. } => StatusCode::NOT_FOUND,
        AppError::InvalidReferenceFormat { .. }
        | AppError::MissingReferences { .. }
        | AppError::InvalidRole { .. }
        | AppError::Validation(_)
        | AppError::InvalidTimeRange => StatusCode::BAD_REQUEST,
        AppError::InvalidCourseDuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Renders a service failure as an error envelope with its status code.
pub fn error_response(err: AppError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    (status, Json(ApiResponse::<()>::error(err.to_string()))).into_response()
}

/// Joins the messages of every failed field rule.
///
/// Falls back to the validator's own rendering when no rule carries a message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let messages = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>();

    if messages.is_empty() {
        errors.to_string()
    } else {
        messages.join("; ")
    }
}

/// `400 Bad Request` envelope for a request body that failed its field rules.
pub fn validation_response(errors: &ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(format_validation_errors(errors))),
    )
        .into_response()
}
