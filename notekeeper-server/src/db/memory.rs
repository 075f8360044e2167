//! In-process note store for development and tests

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NoteStore, StoreError};
use crate::models::{Note, NoteDraft, NoteId};

/// Note store holding everything in memory, in insertion order.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: RwLock<Vec<Note>>,
    closed: AtomicBool,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("memory store is closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        self.ensure_open()?;
        let note = draft.into_note(Uuid::new_v4());
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn find_all(&self) -> Result<Vec<Note>, StoreError> {
        self.ensure_open()?;
        Ok(self.notes.read().await.clone())
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, StoreError> {
        self.ensure_open()?;
        let notes = self.notes.read().await;
        Ok(notes.iter().find(|n| n.id == id).cloned())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        tracing::info!("Memory store closed");
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
