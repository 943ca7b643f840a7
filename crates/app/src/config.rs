//! Configuration loading
//!
//! Every section is optional. A missing file means all defaults; a present but
//! malformed file is an error.

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use daybook_api::DEFAULT_PORT;
use daybook_core::PasswordPolicy;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "DAYBOOK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Could not determine data directory")]
    NoDataDir,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Argon2id cost: `memory_kib`, `iterations`, `parallelism`
    pub auth: PasswordPolicy,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Body of `GET /api/ping`
    pub ping_message: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            ping_message: "ping".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Defaults to `daybook.db` in the platform data directory
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl Config {
    /// Load from the first CLI argument, `DAYBOOK_CONFIG`, or the platform
    /// config directory, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        match explicit {
            Some(path) => Self::from_file(&path),
            None => match project_dirs().map(|d| d.config_dir().join("config.toml")) {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Database file, falling back to the platform data directory
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => project_dirs()
                .map(|d| d.data_dir().join("daybook.db"))
                .ok_or(ConfigError::NoDataDir),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "onyx", "daybook")
}
