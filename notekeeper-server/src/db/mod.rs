//! Database layer - note store trait and its backends
//!
//! # Design Principles
//!
//! - One explicit store handle per process, built at startup and closed on shutdown
//! - Drafts are validated before they get here; the store only assigns ids and persists
//! - Lookups by id return `None` on a miss, never an error
//! - Connection loss surfaces as `StoreError::Unavailable`; the pool reconnects on its own

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Note, NoteDraft, NoteId};

pub use memory::MemoryNoteStore;
pub use pool::{create_pool, create_pool_with_options, PoolSettings};
pub use postgres::PgNoteStore;

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend cannot be reached (connection refused, pool exhausted or closed)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),

    /// Persisted record no longer decodes into a note
    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Persistence boundary for notes
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a validated draft under a fresh id and return the stored note.
    async fn insert(&self, draft: NoteDraft) -> Result<Note, StoreError>;

    /// Snapshot of every stored note.
    async fn find_all(&self) -> Result<Vec<Note>, StoreError>;

    /// Exact-match lookup; `None` when no note has this id.
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, StoreError>;

    /// Release backend resources. Further calls fail with `Unavailable`.
    async fn close(&self);

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}
