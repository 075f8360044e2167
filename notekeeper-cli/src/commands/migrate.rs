//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use notekeeper_server::db::{NoteStore, PgNoteStore, PoolSettings};

use crate::config::NotekeeperConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

/// Create the notes schema and exit
pub async fn run_migrate(args: MigrateArgs, config: &NotekeeperConfig) -> Result<()> {
    let database_url = args
        .database_url
        .or_else(|| config.store.database_url.clone())
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.notekeeper/config.toml")?;

    let store = PgNoteStore::connect(&database_url, PoolSettings::default())
        .await
        .context("Failed to connect to database")?;

    let result = store.migrate().await.context("Failed to run migrations");
    store.close().await;
    result?;

    println!("Schema is up to date");
    Ok(())
}
