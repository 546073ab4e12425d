/// Database schema setup
///
/// The schema is small enough to live inline: two tables, created
/// idempotently at startup. UNIQUE constraints on `users.username`,
/// `users.token`, and `notes.share_token` are the uniqueness arbiters
/// for registration, live sessions, and share links respectively.

use sqlx::SqlitePool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BLOB PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        token TEXT UNIQUE,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id BLOB PRIMARY KEY,
        user_id BLOB NOT NULL REFERENCES users(id),
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT '',
        tags TEXT NOT NULL DEFAULT '',
        share_token TEXT UNIQUE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes(user_id)",
];

/// Runs the schema setup
///
/// Safe to run on every startup; existing tables are left untouched.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema is up to date");
    Ok(())
}
