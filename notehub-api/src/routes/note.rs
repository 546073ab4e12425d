/// Note endpoints
///
/// All routes here run inside the auth layer; the owning user arrives as
/// an `Extension<User>`. Every lookup is ownership-scoped, so another
/// user's note and a nonexistent note are the same 404.
///
/// # Endpoints
///
/// - `POST /note/create` - Create a note
/// - `POST /note/update` - Full overwrite of a note's mutable fields
/// - `POST /note/delete` - Hard delete
/// - `GET /note/detail` - Fetch one note, tags decoded to a list
/// - `GET /note/list` - Filtered listing (keyword, category, tags)
/// - `GET /note/tags` - De-duplicated union of the user's tags
/// - `GET /note/categories` - Distinct non-empty categories

use crate::{
    app::AppState,
    error::{ok, ok_empty, ApiError, ApiResult, Envelope},
    extract::{Json, Query},
};
use axum::{extract::State, Extension};
use chrono::{DateTime, Utc};
use notehub_shared::{
    models::{
        note::{CreateNote, Note, NoteFilter, UpdateNote},
        user::User,
    },
    tags::{decode_tags, encode_tags},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Create/update request body
///
/// Absent fields default to empty; update is a full overwrite, never a
/// merge. `noteId` is ignored on create and required on update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub note_id: Option<Uuid>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Delete request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteIdRequest {
    pub note_id: Option<Uuid>,
}

/// Detail query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailQuery {
    pub note_id: Option<Uuid>,
}

/// Listing query
///
/// `tags` is a comma-separated list; the no-comma tag invariant makes
/// that unambiguous.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub keyword: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub tags: String,
}

/// Note as returned on the wire, tags decoded to a list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub share_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteView {
    fn from(note: Note) -> Self {
        let tags = note.tag_list();
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            category: note.category,
            tags,
            share_token: note.share_token,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Create response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateData {
    pub note_id: Uuid,
}

/// Detail response payload
#[derive(Debug, Serialize)]
pub struct DetailData {
    pub note: NoteView,
}

/// Listing response payload
#[derive(Debug, Serialize)]
pub struct ListData {
    pub notes: Vec<NoteView>,
}

fn required_note_id(note_id: Option<Uuid>) -> ApiResult<Uuid> {
    note_id.ok_or_else(|| ApiError::Validation("noteId required".to_string()))
}

/// Creates a note owned by the current user
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<Json<Envelope<CreateData>>> {
    let tags = encode_tags(&req.tags)?;

    let note = Note::create(
        &state.db,
        CreateNote {
            user_id: user.id,
            title: req.title,
            content: req.content,
            category: req.category,
            tags,
        },
    )
    .await?;

    Ok(ok(CreateData { note_id: note.id }))
}

/// Overwrites a note's title, content, category, and tags
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<Json<Envelope<Value>>> {
    let note_id = required_note_id(req.note_id)?;
    let tags = encode_tags(&req.tags)?;

    let updated = Note::update_owned(
        &state.db,
        user.id,
        note_id,
        UpdateNote {
            title: req.title,
            content: req.content,
            category: req.category,
            tags,
        },
    )
    .await?;

    if !updated {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(ok_empty())
}

/// Hard-deletes a note
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<NoteIdRequest>,
) -> ApiResult<Json<Envelope<Value>>> {
    let note_id = required_note_id(req.note_id)?;

    if !Note::delete_owned(&state.db, user.id, note_id).await? {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(ok_empty())
}

/// Returns one note with its tags decoded
pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<Json<Envelope<DetailData>>> {
    let note_id = required_note_id(query.note_id)?;

    let note = Note::find_owned(&state.db, user.id, note_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(ok(DetailData { note: note.into() }))
}

/// Lists the current user's notes matching the filter
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Envelope<ListData>>> {
    let filter = NoteFilter {
        keyword: query.keyword,
        category: query.category,
        tags: decode_tags(&query.tags),
    };

    let notes = Note::list_owned(&state.db, user.id, &filter).await?;

    Ok(ok(ListData {
        notes: notes.into_iter().map(NoteView::from).collect(),
    }))
}

/// Returns the de-duplicated union of the user's tags
pub async fn tags(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Envelope<Value>>> {
    let tags = Note::tags_for_user(&state.db, user.id).await?;

    Ok(ok(serde_json::json!({ "tags": tags })))
}

/// Returns the user's distinct non-empty categories
pub async fn categories(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Envelope<Value>>> {
    let categories = Note::categories_for_user(&state.db, user.id).await?;

    Ok(ok(serde_json::json!({ "categories": categories })))
}
