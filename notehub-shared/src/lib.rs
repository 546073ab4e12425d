//! # NoteHub Shared Library
//!
//! This crate contains the types and business logic shared by the NoteHub
//! API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (`User`, `Note`) and their queries
//! - `auth`: Password hashing and opaque token generation
//! - `db`: Connection pool and schema management
//! - `tags`: Codec for the delimited tag column

pub mod auth;
pub mod db;
pub mod models;
pub mod tags;

/// Current version of the NoteHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
