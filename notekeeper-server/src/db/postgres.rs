//! PostgreSQL note store
//!
//! Notes live in a single `notes` table. The embedded tag record is kept as
//! a JSONB document so the row mirrors the wire shape one to one.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::migrations;
use super::pool::{create_pool_with_options, PoolSettings};
use super::{NoteStore, StoreError};
use crate::models::{Category, Note, NoteDraft, NoteId, Tag};

/// Note row as stored
#[derive(Debug, FromRow)]
struct NoteRow {
    id: Uuid,
    title: String,
    content: String,
    category: String,
    pinned: bool,
    tags: Json<Tag>,
}

impl TryFrom<NoteRow> for Note {
    type Error = StoreError;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse().map_err(|e| StoreError::CorruptRecord {
            id: row.id.to_string(),
            reason: format!("{}", e),
        })?;

        Ok(Note {
            id: row.id,
            title: row.title,
            content: row.content,
            category,
            pinned: row.pinned,
            tags: row.tags.0,
        })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(e.to_string()),
            // SQLSTATE class 08 = connection exception, 57P0x = server shutting down
            sqlx::Error::Database(db)
                if db
                    .code()
                    .is_some_and(|code| code.starts_with("08") || code.starts_with("57P0")) =>
            {
                Self::Unavailable(e.to_string())
            }
            _ => Self::Database(e.to_string()),
        }
    }
}

/// Note store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self, StoreError> {
        let pool = create_pool_with_options(database_url, settings).await?;
        tracing::debug!(
            max_connections = settings.max_connections,
            "Postgres pool ready"
        );
        Ok(Self::new(pool))
    }

    /// Create the schema if missing.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        migrations::run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn insert(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        let row: NoteRow = sqlx::query_as(
            r#"
            INSERT INTO notes (id, title, content, category, pinned, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, content, category, pinned, tags
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(draft.title())
        .bind(draft.content())
        .bind(draft.category().as_str())
        .bind(draft.pinned())
        .bind(Json(draft.tags().clone()))
        .fetch_one(&self.pool)
        .await?;

        Note::try_from(row)
    }

    async fn find_all(&self) -> Result<Vec<Note>, StoreError> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, title, content, category, pinned, tags
            FROM notes
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Note::try_from).collect()
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, StoreError> {
        let row: Option<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, title, content, category, pinned, tags
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Note::try_from).transpose()
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Postgres pool closed");
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
