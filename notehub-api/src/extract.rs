/// Envelope-aware extractors
///
/// axum's default `Json` and `Query` extractors reject malformed input
/// with plain-text bodies (and 415/422 statuses). The API promises the
/// `{code, msg, data}` envelope on every error, so these wrappers route
/// extraction failures through [`ApiError::Validation`] instead: a body
/// that fails to parse is a 400 with code 4003, like any other bad
/// input. Handlers use these in place of the axum types; the `Json`
/// wrapper also serves as the response type, delegating to `axum::Json`.

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// `axum::Json` with rejections mapped into the envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

/// `axum::extract::Query` with rejections mapped into the envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
