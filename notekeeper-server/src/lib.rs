//! notekeeper-server: note records over a document store, served via HTTP
//!
//! - [`models`]: note types and input validation
//! - [`db`]: the [`db::NoteStore`] trait with Postgres and in-memory backends
//! - [`http`]: axum router, error envelopes, server lifecycle

pub mod db;
pub mod http;
pub mod models;

pub use db::{MemoryNoteStore, NoteStore, PgNoteStore, StoreError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
