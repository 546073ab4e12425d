/// Admin endpoints
///
/// All routes here sit behind both the auth layer and the admin gate:
/// an unauthenticated request gets 401, an authenticated non-admin gets
/// 403. Listings and deletes cross user boundaries deliberately.
///
/// # Endpoints
///
/// - `GET /admin/users` - List users, optional username substring filter
/// - `POST /admin/user/delete` - Delete a user and their notes
/// - `GET /admin/notes` - Cross-user note listing
/// - `POST /admin/note/delete` - Delete any note by id
/// - `GET /admin/logs` - Audit log stub, always empty

use crate::{
    app::AppState,
    error::{ok, ok_empty, ApiError, ApiResult, Envelope},
    extract::{Json, Query},
};
use axum::{extract::State, Extension};
use notehub_shared::models::{
    note::Note,
    user::{Role, User},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// User listing query
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    #[serde(default)]
    pub keyword: String,
}

/// Note listing query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListQuery {
    #[serde(default)]
    pub keyword: String,

    pub user_id: Option<Uuid>,
}

/// User delete request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub user_id: Option<Uuid>,
}

/// Note delete request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteRequest {
    pub note_id: Option<Uuid>,
}

/// User as listed to admins: no hash, no token
#[derive(Debug, Serialize)]
pub struct AdminUserView {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Note as listed to admins
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNoteView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Users listing payload
#[derive(Debug, Serialize)]
pub struct UsersData {
    pub users: Vec<AdminUserView>,
}

/// Notes listing payload
#[derive(Debug, Serialize)]
pub struct NotesData {
    pub notes: Vec<AdminNoteView>,
}

/// Lists all users, optionally filtered by username substring
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Envelope<UsersData>>> {
    let users = User::search(&state.db, &query.keyword).await?;

    Ok(ok(UsersData {
        users: users
            .into_iter()
            .map(|u| AdminUserView {
                id: u.id,
                username: u.username,
                role: u.role,
            })
            .collect(),
    }))
}

/// Deletes a user and cascade-deletes their notes
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Json(req): Json<DeleteUserRequest>,
) -> ApiResult<Json<Envelope<Value>>> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::Validation("userId required".to_string()))?;

    if !User::delete_cascade(&state.db, user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(admin = %admin.username, user_id = %user_id, "User deleted by admin");

    Ok(ok_empty())
}

/// Lists notes across all users
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<NoteListQuery>,
) -> ApiResult<Json<Envelope<NotesData>>> {
    let notes = Note::admin_search(&state.db, &query.keyword, query.user_id).await?;

    Ok(ok(NotesData {
        notes: notes
            .into_iter()
            .map(|n| AdminNoteView {
                id: n.id,
                user_id: n.user_id,
                tags: n.tag_list(),
                title: n.title,
                category: n.category,
            })
            .collect(),
    }))
}

/// Deletes any note by id, no ownership check
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Json(req): Json<DeleteNoteRequest>,
) -> ApiResult<Json<Envelope<Value>>> {
    let note_id = req
        .note_id
        .ok_or_else(|| ApiError::Validation("noteId required".to_string()))?;

    if !Note::admin_delete(&state.db, note_id).await? {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    tracing::info!(admin = %admin.username, note_id = %note_id, "Note deleted by admin");

    Ok(ok_empty())
}

/// Audit log stub
///
/// Always returns an empty list; real audit logging is out of scope.
pub async fn logs() -> ApiResult<Json<Envelope<Value>>> {
    Ok(ok(serde_json::json!({ "logs": [] })))
}
