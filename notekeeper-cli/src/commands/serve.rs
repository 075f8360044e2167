//! HTTP server command
//!
//! Opens the configured note store, serves the notes API, and closes the
//! store once the server has shut down.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use notekeeper_server::db::{MemoryNoteStore, NoteStore, PgNoteStore, PoolSettings};
use notekeeper_server::http::{run_server, ServerConfig};

use crate::config::{NotekeeperConfig, StoreBackend};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to [default: 127.0.0.1:3030]
    #[arg(long, short = 'b', env = "NOTEKEEPER_BIND")]
    pub bind: Option<SocketAddr>,

    /// Note store backend [default: postgres]
    #[arg(long, value_enum, env = "NOTEKEEPER_STORE")]
    pub store: Option<StoreBackend>,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections [default: 5]
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Seconds to wait for a pooled connection before answering 503 [default: 5]
    #[arg(long, value_name = "SECS")]
    pub acquire_timeout: Option<u64>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Skip creating the schema at startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Effective serve settings after merging flags, env and config file
#[derive(Debug, Clone)]
pub struct ServeSettings {
    pub server: ServerConfig,
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub pool: PoolSettings,
    pub migrate: bool,
}

impl ServeSettings {
    pub fn resolve(args: &ServeArgs, config: &NotekeeperConfig) -> Self {
        let defaults = ServerConfig::default();
        let pool_defaults = PoolSettings::default();

        let server = ServerConfig {
            bind_addr: args
                .bind
                .or(config.server.bind)
                .unwrap_or(defaults.bind_addr),
            cors_permissive: args.cors_permissive
                || config.server.cors_permissive.unwrap_or(defaults.cors_permissive),
            request_timeout: args
                .timeout
                .or(config.server.request_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        };

        let pool = PoolSettings {
            max_connections: args
                .max_connections
                .or(config.store.max_connections)
                .unwrap_or(pool_defaults.max_connections),
            acquire_timeout: args
                .acquire_timeout
                .or(config.store.acquire_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(pool_defaults.acquire_timeout),
        };

        Self {
            server,
            backend: args.store.or(config.store.backend).unwrap_or_default(),
            database_url: args
                .database_url
                .clone()
                .or_else(|| config.store.database_url.clone()),
            pool,
            migrate: !args.no_migrate,
        }
    }
}

/// Open the note store selected by `settings`.
async fn open_store(settings: &ServeSettings) -> Result<Arc<dyn NoteStore>> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory note store; notes are lost on exit");
            Ok(Arc::new(MemoryNoteStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = settings.database_url.as_deref().context(
                "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.notekeeper/config.toml",
            )?;

            let store = PgNoteStore::connect(database_url, settings.pool)
                .await
                .context("Failed to connect to database")?;

            if settings.migrate {
                store.migrate().await.context("Failed to run migrations")?;
            }

            Ok(Arc::new(store))
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: &NotekeeperConfig) -> Result<()> {
    let settings = ServeSettings::resolve(&args, config);
    tracing::info!(
        backend = ?settings.backend,
        "Starting notekeeper server on {}",
        settings.server.bind_addr
    );

    let store = open_store(&settings).await?;

    // Blocks until shutdown; the store is closed on the way out
    run_server(store, settings.server)
        .await
        .context("Server error")?;

    Ok(())
}
