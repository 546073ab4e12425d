//! # NoteHub API Server Library
//!
//! This library provides the HTTP layer of the NoteHub note-taking
//! backend.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and the `{code, msg, data}` envelope
//! - `extract`: Extractors whose rejections speak the envelope
//! - `middleware`: Bearer-token authentication and admin gating
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
