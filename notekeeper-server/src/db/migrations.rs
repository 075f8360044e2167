//! Schema for the notes collection

use sqlx::PgPool;

/// Create the notes table if it does not exist yet.
///
/// The CHECK constraints repeat the draft validation rules so rows written
/// by other tools still satisfy the same invariants.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running note migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL CHECK (length(btrim(title)) > 0),
            content TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT 'personal'
                CHECK (category IN ('personal', 'work', 'study', 'other')),
            pinned BOOLEAN NOT NULL DEFAULT FALSE,
            tags JSONB NOT NULL
                CHECK (length(btrim(tags->>'label')) > 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Note migrations complete");
    Ok(())
}
