/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint (public)
/// - `user`: Registration, login, logout, profile, password change
/// - `note`: Ownership-scoped note CRUD, listing, tags, categories
/// - `share`: Public share links
/// - `admin`: Cross-user moderation endpoints

pub mod admin;
pub mod health;
pub mod note;
pub mod share;
pub mod user;

use crate::error::ApiError;
use validator::ValidationErrors;

/// Collapses validator output into a single envelope message
pub(crate) fn validation_error(errors: ValidationErrors) -> ApiError {
    let msg = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Request validation failed".to_string());

    ApiError::Validation(msg)
}
