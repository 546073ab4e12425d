/// Note model and database operations
///
/// Every non-admin query here is ownership-scoped: the owning user id is
/// part of the WHERE clause, so "absent" and "not yours" are the same
/// empty result. Admin variants drop the scope deliberately.
///
/// Tags live in a single delimited TEXT column (see [`crate::tags`]);
/// keyword and category filters are pushed into SQL, the tag-subset
/// filter is applied after fetch since the column is a scalar.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id BLOB PRIMARY KEY,
///     user_id BLOB NOT NULL REFERENCES users(id),
///     title TEXT NOT NULL,
///     content TEXT NOT NULL,
///     category TEXT NOT NULL DEFAULT '',
///     tags TEXT NOT NULL DEFAULT '',
///     share_token TEXT UNIQUE,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::tags::decode_tags;

const NOTE_COLUMNS: &str =
    "id, user_id, title, content, category, tags, share_token, created_at, updated_at";

/// Note model
///
/// `share_token` is the sole share-visibility gate: non-null means the
/// note is publicly readable by anyone holding the token.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID (UUID v4)
    pub id: Uuid,

    /// Owning user, immutable
    pub user_id: Uuid,

    /// Title (free text)
    pub title: String,

    /// Content (free text)
    pub content: String,

    /// Single free-form category label, empty string when unset
    pub category: String,

    /// Delimited tag scalar as stored (see `crate::tags`)
    pub tags: String,

    /// Public share token, None when the note is private
    pub share_token: Option<String>,

    /// Set once at creation
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Decodes the stored tag scalar into a list
    pub fn tag_list(&self) -> Vec<String> {
        decode_tags(&self.tags)
    }
}

/// Input for creating a new note
///
/// `tags` is the already-encoded scalar; callers encode (and validate)
/// through `crate::tags::encode_tags` first.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
}

/// Input for a full overwrite of a note's mutable fields
///
/// There are no partial/merge semantics: absent request fields arrive
/// here as empty strings.
#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
}

/// Filters for the owner-scoped listing
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Case-sensitive substring match on title, empty matches all
    pub keyword: String,

    /// Exact category match, empty matches all
    pub category: String,

    /// Every tag here must be present on the note, empty matches all
    pub tags: Vec<String>,
}

impl Note {
    /// Creates a new note owned by `data.user_id`
    pub async fn create(pool: &SqlitePool, data: CreateNote) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: data.title,
            content: data.content,
            category: data.category,
            tags: data.tags,
            share_token: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO notes (id, user_id, title, content, category, tags, share_token, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(note.id)
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.category)
        .bind(&note.tags)
        .bind(&note.share_token)
        .bind(note.created_at)
        .bind(note.updated_at)
        .execute(pool)
        .await?;

        Ok(note)
    }

    /// Finds a note by id, scoped to its owner
    ///
    /// Returns None for both "no such note" and "not owned by user_id";
    /// callers cannot tell the two apart, by design.
    pub async fn find_owned(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Fully overwrites the mutable fields of an owned note
    ///
    /// Refreshes `updated_at`. Returns false when the note does not exist
    /// or is owned by someone else.
    pub async fn update_owned(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notes
            SET title = ?, content = ?, category = ?, tags = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.category)
        .bind(&data.tags)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard-deletes an owned note
    pub async fn delete_owned(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists an owner's notes matching the filter
    ///
    /// Keyword (case-sensitive substring on title, via `instr`) and exact
    /// category are pushed into SQL; the tag-subset check runs after
    /// fetch.
    pub async fn list_owned(
        pool: &SqlitePool,
        user_id: Uuid,
        filter: &NoteFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ?");
        if !filter.keyword.is_empty() {
            query.push_str(" AND instr(title, ?) > 0");
        }
        if !filter.category.is_empty() {
            query.push_str(" AND category = ?");
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Note>(&query).bind(user_id);
        if !filter.keyword.is_empty() {
            q = q.bind(&filter.keyword);
        }
        if !filter.category.is_empty() {
            q = q.bind(&filter.category);
        }

        let notes = q.fetch_all(pool).await?;

        if filter.tags.is_empty() {
            return Ok(notes);
        }

        Ok(notes
            .into_iter()
            .filter(|note| {
                let note_tags = note.tag_list();
                filter.tags.iter().all(|t| note_tags.contains(t))
            })
            .collect())
    }

    /// Returns the de-duplicated union of an owner's tags
    pub async fn tags_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT tags FROM notes WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        let set: BTreeSet<String> = rows
            .into_iter()
            .flat_map(|(stored,)| decode_tags(&stored))
            .collect();

        Ok(set.into_iter().collect())
    }

    /// Returns an owner's distinct non-empty categories
    pub async fn categories_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM notes WHERE user_id = ? AND category <> ''",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Stores a share token on an owned note
    pub async fn set_share_token(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
        token: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE notes SET share_token = ? WHERE id = ? AND user_id = ?")
            .bind(token)
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clears the share token of an owned note
    ///
    /// Idempotent: clearing an already-private note still reports success
    /// as long as the note exists and is owned by `user_id`.
    pub async fn clear_share_token(
        pool: &SqlitePool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notes SET share_token = NULL WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves a share token to its note, no ownership involved
    pub async fn find_by_share_token(
        pool: &SqlitePool,
        token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE share_token = ?"
        ))
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    /// Cross-user listing for admins
    ///
    /// Optional case-sensitive title substring and optional owner filter;
    /// no pagination.
    pub async fn admin_search(
        pool: &SqlitePool,
        keyword: &str,
        user_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE 1 = 1");
        if !keyword.is_empty() {
            query.push_str(" AND instr(title, ?) > 0");
        }
        if user_id.is_some() {
            query.push_str(" AND user_id = ?");
        }
        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Note>(&query);
        if !keyword.is_empty() {
            q = q.bind(keyword);
        }
        if let Some(user_id) = user_id {
            q = q.bind(user_id);
        }

        q.fetch_all(pool).await
    }

    /// Cross-user delete by id alone, for admins
    pub async fn admin_delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations::run_migrations, pool::create_test_pool};
    use crate::models::user::{CreateUser, Role, User};
    use crate::tags::encode_tags;

    async fn test_pool() -> SqlitePool {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn test_user(pool: &SqlitePool, username: &str) -> User {
        User::create(
            pool,
            CreateUser {
                username: username.to_string(),
                password_hash: "$argon2id$test".to_string(),
                role: Role::User,
            },
        )
        .await
        .unwrap()
    }

    fn note_input(user_id: Uuid, title: &str, category: &str, tags: &[&str]) -> CreateNote {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        CreateNote {
            user_id,
            title: title.to_string(),
            content: format!("content of {title}"),
            category: category.to_string(),
            tags: encode_tags(&tags).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let note = Note::create(&pool, note_input(user.id, "groceries", "home", &["x", "y"]))
            .await
            .unwrap();

        let fetched = Note::find_owned(&pool, user.id, note.id)
            .await
            .unwrap()
            .expect("Owner should see the note");

        assert_eq!(fetched.title, "groceries");
        assert_eq!(fetched.tag_list(), vec!["x", "y"]);
        assert!(fetched.share_token.is_none());
    }

    #[tokio::test]
    async fn test_empty_tags_decode_to_empty_list() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let note = Note::create(&pool, note_input(user.id, "untagged", "", &[]))
            .await
            .unwrap();

        let fetched = Note::find_owned(&pool, user.id, note.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.tag_list(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_ownership_scoping() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;
        let bob = test_user(&pool, "bob").await;

        let note = Note::create(&pool, note_input(alice.id, "secret", "", &[]))
            .await
            .unwrap();

        // Bob cannot see, update, or delete Alice's note
        assert!(Note::find_owned(&pool, bob.id, note.id)
            .await
            .unwrap()
            .is_none());

        let updated = Note::update_owned(
            &pool,
            bob.id,
            note.id,
            UpdateNote {
                title: "stolen".to_string(),
                content: String::new(),
                category: String::new(),
                tags: String::new(),
            },
        )
        .await
        .unwrap();
        assert!(!updated);

        assert!(!Note::delete_owned(&pool, bob.id, note.id).await.unwrap());
        assert!(Note::delete_owned(&pool, alice.id, note.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let note = Note::create(&pool, note_input(user.id, "draft", "work", &["a"]))
            .await
            .unwrap();

        let ok = Note::update_owned(
            &pool,
            user.id,
            note.id,
            UpdateNote {
                title: "final".to_string(),
                content: "done".to_string(),
                category: String::new(),
                tags: String::new(),
            },
        )
        .await
        .unwrap();
        assert!(ok);

        let fetched = Note::find_owned(&pool, user.id, note.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "final");
        assert_eq!(fetched.category, "");
        assert_eq!(fetched.tag_list(), Vec::<String>::new());
        assert!(fetched.updated_at >= fetched.created_at);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        Note::create(&pool, note_input(user.id, "rust notes", "dev", &["rust", "lang"]))
            .await
            .unwrap();
        Note::create(&pool, note_input(user.id, "shopping list", "home", &["food"]))
            .await
            .unwrap();
        Note::create(&pool, note_input(user.id, "rust recipes", "home", &["rust", "food"]))
            .await
            .unwrap();

        let all = Note::list_owned(&pool, user.id, &NoteFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let by_keyword = Note::list_owned(
            &pool,
            user.id,
            &NoteFilter {
                keyword: "rust".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_keyword.len(), 2);

        // Title match is case-sensitive
        let by_upper = Note::list_owned(
            &pool,
            user.id,
            &NoteFilter {
                keyword: "RUST".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(by_upper.is_empty());

        let by_category = Note::list_owned(
            &pool,
            user.id,
            &NoteFilter {
                category: "home".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_category.len(), 2);

        // Every requested tag must be present
        let by_tags = Note::list_owned(
            &pool,
            user.id,
            &NoteFilter {
                tags: vec!["rust".to_string(), "food".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_tags.len(), 1);
        assert_eq!(by_tags[0].title, "rust recipes");
    }

    #[tokio::test]
    async fn test_tags_and_categories_union() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        Note::create(&pool, note_input(user.id, "a", "dev", &["rust", "lang"]))
            .await
            .unwrap();
        Note::create(&pool, note_input(user.id, "b", "dev", &["rust", "food"]))
            .await
            .unwrap();
        Note::create(&pool, note_input(user.id, "c", "", &[]))
            .await
            .unwrap();

        let mut tags = Note::tags_for_user(&pool, user.id).await.unwrap();
        tags.sort();
        assert_eq!(tags, vec!["food", "lang", "rust"]);

        let categories = Note::categories_for_user(&pool, user.id).await.unwrap();
        assert_eq!(categories, vec!["dev"]);
    }

    #[tokio::test]
    async fn test_share_token_lifecycle() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let note = Note::create(&pool, note_input(user.id, "public", "", &[]))
            .await
            .unwrap();

        assert!(Note::set_share_token(&pool, user.id, note.id, "share-1")
            .await
            .unwrap());

        let found = Note::find_by_share_token(&pool, "share-1").await.unwrap();
        assert_eq!(found.unwrap().id, note.id);

        assert!(Note::clear_share_token(&pool, user.id, note.id)
            .await
            .unwrap());
        assert!(Note::find_by_share_token(&pool, "share-1")
            .await
            .unwrap()
            .is_none());

        // Disabling again is still a success for an owned note
        assert!(Note::clear_share_token(&pool, user.id, note.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_set_share_token_reports_missing_note() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let note = Note::create(&pool, note_input(user.id, "gone", "", &[]))
            .await
            .unwrap();
        assert!(Note::delete_owned(&pool, user.id, note.id).await.unwrap());

        // A deleted (or never-existing) note must not report success
        assert!(!Note::set_share_token(&pool, user.id, note.id, "share-x")
            .await
            .unwrap());
        assert!(!Note::set_share_token(&pool, user.id, Uuid::new_v4(), "share-y")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_admin_search_crosses_users() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;
        let bob = test_user(&pool, "bob").await;

        Note::create(&pool, note_input(alice.id, "alpha", "", &[]))
            .await
            .unwrap();
        Note::create(&pool, note_input(bob.id, "alpha two", "", &[]))
            .await
            .unwrap();

        let all = Note::admin_search(&pool, "", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let alices = Note::admin_search(&pool, "", Some(alice.id)).await.unwrap();
        assert_eq!(alices.len(), 1);

        let by_keyword = Note::admin_search(&pool, "two", None).await.unwrap();
        assert_eq!(by_keyword.len(), 1);
    }

    #[tokio::test]
    async fn test_admin_delete_ignores_ownership() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;

        let note = Note::create(&pool, note_input(alice.id, "target", "", &[]))
            .await
            .unwrap();

        assert!(Note::admin_delete(&pool, note.id).await.unwrap());
        assert!(!Note::admin_delete(&pool, note.id).await.unwrap());
    }
}
