/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`. Errors convert to the
/// uniform `{code, msg, data}` envelope the whole API speaks:
/// `code = 0` is success, `4001` authentication, `4002` permission,
/// `4003` client/validation error (including not-found), `5000` server
/// error. HTTP status and application code travel together.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::extract::Json;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Response envelope shared by success and error paths
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Application code, 0 on success
    pub code: i32,

    /// Human-readable message
    pub msg: String,

    /// Payload, `{}` when there is nothing to return
    pub data: T,
}

/// Builds a success envelope (`code = 0, msg = "ok"`)
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        code: 0,
        msg: "ok".to_string(),
        data,
    })
}

/// Builds an empty success envelope
pub fn ok_empty() -> Json<Envelope<serde_json::Value>> {
    ok(serde_json::json!({}))
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing/malformed input or duplicate username (400, code 4003)
    Validation(String),

    /// Missing or invalid bearer token (401, code 4001)
    Unauthenticated(String),

    /// Authenticated but lacking the admin role (403, code 4002)
    Forbidden(String),

    /// Resource absent or not owned by the caller (404, code 4003)
    ///
    /// The two cases are indistinguishable on purpose: an ownership miss
    /// must not leak that the resource exists.
    NotFound(String),

    /// Unexpected failure (500, code 5000); detail is logged, not returned
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// HTTP status and application code for this error
    pub fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, 4003),
            ApiError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, 4001),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, 4002),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, 4003),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5000),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let msg = match &self {
            // Log internal errors server-side, return a generic message
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            ApiError::Validation(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg.clone(),
        };

        let body = Json(Envelope {
            code,
            msg,
            data: serde_json::json!({}),
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // SQLite reports unique violations as "UNIQUE constraint failed: <table>.<column>"
                let message = db_err.message();
                if message.contains("UNIQUE constraint failed") {
                    if message.contains("users.username") {
                        return ApiError::Validation("Username already exists".to_string());
                    }
                    return ApiError::Validation(format!("Constraint violation: {}", message));
                }

                ApiError::Internal(format!("Database error: {}", message))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert password hashing errors to API errors
impl From<notehub_shared::auth::password::PasswordError> for ApiError {
    fn from(err: notehub_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert body extraction failures to API errors
///
/// Keeps malformed JSON (and missing content-type) inside the envelope
/// instead of axum's plain-text 4xx responses.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Convert query string extraction failures to API errors
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Convert tag encoding errors to API errors
impl From<notehub_shared::tags::TagError> for ApiError {
    fn from(err: notehub_shared::tags::TagError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Validation("Invalid input".to_string());
        assert_eq!(err.to_string(), "Validation error: Invalid input");

        let err = ApiError::NotFound("Note not found".to_string());
        assert_eq!(err.to_string(), "Not found: Note not found");
    }

    #[test]
    fn test_status_and_code_mapping() {
        let cases = [
            (
                ApiError::Validation(String::new()),
                StatusCode::BAD_REQUEST,
                4003,
            ),
            (
                ApiError::Unauthenticated(String::new()),
                StatusCode::UNAUTHORIZED,
                4001,
            ),
            (
                ApiError::Forbidden(String::new()),
                StatusCode::FORBIDDEN,
                4002,
            ),
            (
                ApiError::NotFound(String::new()),
                StatusCode::NOT_FOUND,
                4003,
            ),
            (
                ApiError::Internal(String::new()),
                StatusCode::INTERNAL_SERVER_ERROR,
                5000,
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
