//! Configuration for People MCP Server

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory
const LOCAL_CONFIG: &str = "people-mcp.toml";

/// People MCP configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PeopleConfig {
    /// Database settings
    pub database: DatabaseConfig,

    /// Tool surface settings
    pub tools: ToolsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    /// Default: demo.db in the working directory
    pub path: PathBuf,

    /// How long a call waits on a locked database before failing
    /// Default: 5000
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("demo.db"),
            busy_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub read_policy: ReadPolicy,
    pub error_mode: ErrorMode,
}

/// What `read_data` accepts from the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Any single statement runs as given, inside a transaction that is
    /// always rolled back.
    #[default]
    Passthrough,
    /// Statements that would write are refused before they run.
    ReadOnly,
}

/// How tools report store failures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Log and answer `false` / `[]`
    #[default]
    Sentinel,
    /// Answer with an MCP error
    Strict,
}

impl PeopleConfig {
    /// Load configuration
    ///
    /// Looks for config in:
    /// 1. `explicit` (from `--config` / `PEOPLE_MCP_CONFIG`), which must exist
    /// 2. `./people-mcp.toml`
    /// 3. `<config dir>/people-mcp/config.toml`
    ///
    /// Falls back to defaults when no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and parse a single config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Create a default config pointing to a specific database
    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseConfig {
                path: path.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("people-mcp").join("config.toml"))
            .filter(|path| path.is_file())
    }
}
