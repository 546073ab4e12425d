/// User model and database operations
///
/// Users own notes and carry the session state: a nullable opaque token
/// column that is set on login and cleared on logout. Passwords are
/// stored as Argon2id hashes, never in plaintext.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BLOB PRIMARY KEY,
///     username TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     token TEXT UNIQUE,
///     role TEXT NOT NULL DEFAULT 'user',
///     created_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// User role
///
/// Admin unlocks the cross-user moderation endpoints. Everything else is
/// ownership-scoped regardless of role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Returns true for the admin role
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User model representing an account
///
/// `token` is the live session credential: `None` means logged out. Two
/// users never hold the same live token (UNIQUE constraint).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Username, unique and immutable after creation
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Current opaque session token, None when logged out
    pub token: Option<String>,

    /// User role (`user` by default)
    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Username (must be unique)
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Role for the new account
    pub role: Role,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username already exists (unique constraint
    /// violation) or the database fails.
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            token: None,
            role: data.role,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, token, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.token)
        .bind(user.role)
        .bind(user.created_at)
        .execute(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, token, role, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by exact username
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, token, role, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Resolves a live session token to its user
    ///
    /// Returns None when no user currently holds the token. This is the
    /// whole session registry: a flat unique-token lookup.
    pub async fn find_by_token(
        pool: &SqlitePool,
        token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, token, role, created_at
            FROM users
            WHERE token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    /// Sets or clears the session token
    ///
    /// `Some(token)` on login, `None` on logout. Logout is idempotent:
    /// clearing an already-null token still succeeds.
    pub async fn set_token(
        pool: &SqlitePool,
        id: Uuid,
        token: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET token = ? WHERE id = ?")
            .bind(token)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the stored password hash
    pub async fn set_password_hash(
        pool: &SqlitePool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Promotes an existing account to admin
    pub async fn set_role(pool: &SqlitePool, id: Uuid, role: Role) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists users with an optional case-sensitive username substring filter
    ///
    /// Admin-only caller; no pagination.
    pub async fn search(pool: &SqlitePool, keyword: &str) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, username, password_hash, token, role, created_at FROM users",
        );
        if !keyword.is_empty() {
            query.push_str(" WHERE instr(username, ?) > 0");
        }
        query.push_str(" ORDER BY created_at");

        let mut q = sqlx::query_as::<_, User>(&query);
        if !keyword.is_empty() {
            q = q.bind(keyword);
        }

        q.fetch_all(pool).await
    }

    /// Deletes a user and all of their notes in one transaction
    ///
    /// Notes are cascade-deleted rather than orphaned: an orphaned note
    /// would be unreachable through every normal endpoint anyway.
    ///
    /// Returns false if the user did not exist.
    pub async fn delete_cascade(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM notes WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
