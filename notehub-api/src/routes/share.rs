/// Share endpoints
///
/// A note is publicly readable exactly while it carries a share token;
/// there is no separate public/private flag. Enable is idempotent and
/// never rotates an existing token, so a link stays valid until the
/// owner disables sharing.
///
/// # Endpoints
///
/// - `POST /share/enable` - Issue (or return the existing) share token
/// - `POST /share/disable` - Revoke the share token
/// - `GET /share/view` - Public read-only view, no authentication

use crate::{
    app::AppState,
    error::{ok, ok_empty, ApiError, ApiResult, Envelope},
    extract::{Json, Query},
};
use axum::{extract::State, Extension};
use notehub_shared::{
    auth::token::generate_token,
    models::{note::Note, user::User},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Enable/disable request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub note_id: Option<Uuid>,
}

/// Public view query
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub token: String,
}

/// Enable response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareData {
    pub share_token: String,
    pub share_url: String,
}

/// Public view payload: title, content, and the owner's username only
#[derive(Debug, Serialize)]
pub struct ViewData {
    pub title: String,
    pub content: String,
    pub username: String,
}

fn share_url(token: &str) -> String {
    format!("/share/view?token={token}")
}

/// Enables sharing for an owned note
///
/// Returns the existing token unchanged when sharing is already on.
pub async fn enable(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<ShareRequest>,
) -> ApiResult<Json<Envelope<ShareData>>> {
    let note_id = req
        .note_id
        .ok_or_else(|| ApiError::Validation("noteId required".to_string()))?;

    let note = Note::find_owned(&state.db, user.id, note_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    if let Some(existing) = note.share_token {
        return Ok(ok(ShareData {
            share_url: share_url(&existing),
            share_token: existing,
        }));
    }

    let token = generate_token();
    // The note can disappear between the ownership check and the update;
    // an unpersisted token must not be handed out.
    if !Note::set_share_token(&state.db, user.id, note_id, &token).await? {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(ok(ShareData {
        share_url: share_url(&token),
        share_token: token,
    }))
}

/// Disables sharing for an owned note
///
/// Idempotent: disabling an already-private note still succeeds.
pub async fn disable(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<ShareRequest>,
) -> ApiResult<Json<Envelope<Value>>> {
    let note_id = req
        .note_id
        .ok_or_else(|| ApiError::Validation("noteId required".to_string()))?;

    if !Note::clear_share_token(&state.db, user.id, note_id).await? {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(ok_empty())
}

/// Public read-only view of a shared note
///
/// No authentication; an unknown or revoked token is a plain 404.
pub async fn view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> ApiResult<Json<Envelope<ViewData>>> {
    if query.token.is_empty() {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    let note = Note::find_by_share_token(&state.db, &query.token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    let owner = User::find_by_id(&state.db, note.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(ok(ViewData {
        title: note.title,
        content: note.content,
        username: owner.username,
    }))
}
