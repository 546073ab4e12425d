/// Authentication middleware
///
/// Two composable layers, applied per route group:
///
/// - [`require_auth`] extracts the `Authorization: Bearer <token>`
///   header, resolves the opaque token to its user through the flat
///   session lookup, and inserts the resolved [`User`] into request
///   extensions. Handlers extract it with `Extension<User>`.
/// - [`require_admin`] runs after `require_auth` (layered inside it)
///   and rejects non-admin users.
///
/// Failure modes are distinct on purpose: a missing or malformed header
/// is "Not logged in", a token nobody holds is "Invalid token", and an
/// authenticated non-admin is "Permission denied" with 403 rather than
/// 401.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use notehub_shared::models::user::User;

use crate::{app::AppState, error::ApiError};

/// Bearer-token authentication layer
///
/// On success the resolved [`User`] is available to inner layers and
/// handlers via request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthenticated("Not logged in".to_string()))?;

    // A header without the Bearer prefix counts as not logged in
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthenticated("Not logged in".to_string()))?;

    let user = User::find_by_token(&state.db, token)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Invalid token".to_string()))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Admin role gate
///
/// Must be layered inside [`require_auth`] so the user is already
/// resolved; a request that somehow reaches it unauthenticated is
/// rejected as such, never waved through.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<User>()
        .ok_or_else(|| ApiError::Unauthenticated("Not logged in".to_string()))?;

    if !user.role.is_admin() {
        return Err(ApiError::Forbidden("Permission denied".to_string()));
    }

    Ok(next.run(req).await)
}
