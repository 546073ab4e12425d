/// Database models
///
/// This module contains the two persisted record types and their queries:
///
/// - `user`: Accounts, roles, and the flat session token lookup
/// - `note`: Per-user notes with category, tags, and share tokens

pub mod note;
pub mod user;
