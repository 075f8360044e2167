//! notekeeper CLI - runs and maintains the notes API
//!
//! - `serve`: HTTP API over a Postgres or in-memory note store
//! - `migrate`: create the notes schema
//! - `completions`: shell completion scripts

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod config;
mod tracing_setup;

use config::NotekeeperConfig;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "notekeeper",
    author,
    version,
    about = "Minimal note-taking REST API",
    long_about = "Create, list and fetch notes over HTTP. Notes are stored in PostgreSQL \
                  (or in memory for development)."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Config file path [default: ~/.notekeeper/config.toml]
    #[arg(long, global = true, env = "NOTEKEEPER_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the notes HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the notes schema in the database and exit
    Migrate(commands::migrate::MigrateArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so .env values feed clap's env fallbacks
    let dotenv_files = config::load_dotenv();

    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    for path in &dotenv_files {
        tracing::debug!("Loaded .env from {}", path.display());
    }

    let result = run(cli).await;
    tracing_setup::shutdown_otel();
    result
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => {
            let config = NotekeeperConfig::load(cli.config.as_deref())?;
            commands::serve::run_serve(args, &config).await
        }
        Commands::Migrate(args) => {
            let config = NotekeeperConfig::load(cli.config.as_deref())?;
            commands::migrate::run_migrate(args, &config).await
        }
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "notekeeper", &mut std::io::stdout());
            Ok(())
        }
    }
}
