/// Database access layer
///
/// # Modules
///
/// - [`pool`]: SQLite connection pool creation
/// - [`migrations`]: Idempotent schema setup run at startup
pub mod migrations;
pub mod pool;
