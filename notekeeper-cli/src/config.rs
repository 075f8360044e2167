//! Configuration loading
//!
//! Precedence (highest first): command-line flags, environment variables,
//! `~/.notekeeper/config.toml` (or `--config`), built-in defaults.
//! Flags and environment are merged by clap; this module covers the file
//! and `.env` layers.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

/// Which note store backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via DATABASE_URL
    #[default]
    Postgres,
    /// Process memory, lost on exit
    Memory,
}

/// TOML configuration file
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct NotekeeperConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ServerSection {
    pub bind: Option<SocketAddr>,
    pub cors_permissive: Option<bool>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct StoreSection {
    pub backend: Option<StoreBackend>,
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

impl NotekeeperConfig {
    /// Default config file location (~/.notekeeper/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default path is optional; when it is
    /// missing, built-in defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Get the notekeeper config directory path (~/.notekeeper)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".notekeeper"))
}

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.notekeeper/.env
///
/// Runs before tracing is initialised, so it returns the files it loaded
/// for the caller to log.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        // dotenvy doesn't overwrite existing vars
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
bind = "0.0.0.0:8080"
cors_permissive = true
request_timeout_secs = 10

[store]
backend = "memory"
database_url = "postgres://localhost/notes"
max_connections = 3
acquire_timeout_secs = 2
"#
        )
        .unwrap();

        let config = NotekeeperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.bind, Some("0.0.0.0:8080".parse().unwrap()));
        assert_eq!(config.server.cors_permissive, Some(true));
        assert_eq!(config.server.request_timeout_secs, Some(10));
        assert_eq!(config.store.backend, Some(StoreBackend::Memory));
        assert_eq!(config.store.max_connections, Some(3));
        assert_eq!(config.store.acquire_timeout_secs, Some(2));
    }

    #[test]
    fn empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = NotekeeperConfig::from_file(file.path()).unwrap();
        assert_eq!(config, NotekeeperConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(NotekeeperConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn unknown_backend_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\nbackend = \"mongo\"").unwrap();
        assert!(NotekeeperConfig::from_file(file.path()).is_err());
    }
}
