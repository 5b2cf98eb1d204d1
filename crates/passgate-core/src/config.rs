use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::window::AllowedWindow;

/// Workspace configuration: `passgate.toml` next to the data, with a user
/// fallback under the platform config directory. A missing file means
/// defaults; a malformed file is an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// The service window during which mutating actions are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_start")]
    pub start: String,
    #[serde(default = "default_window_end")]
    pub end: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: default_window_start(),
            end: default_window_end(),
        }
    }
}

impl WindowConfig {
    /// Parse the `HH:MM` (or `HH:MM:SS`) pair into an [`AllowedWindow`].
    ///
    /// # Errors
    ///
    /// Returns an error when either bound is not a valid time of day.
    pub fn allowed_window(&self) -> Result<AllowedWindow> {
        let start = parse_time(&self.start)
            .with_context(|| format!("invalid window start '{}'", self.start))?;
        let end = parse_time(&self.end)
            .with_context(|| format!("invalid window end '{}'", self.end))?;
        Ok(AllowedWindow::new(start, end))
    }
}

fn parse_time(raw: &str) -> Result<chrono::NaiveTime, chrono::ParseError> {
    chrono::NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| chrono::NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

/// Where the SQLite store lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user-level configuration from the platform config directory
/// (`<config-dir>/passgate/config.toml`), defaults when absent.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<Config> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    load_config(&config_dir.join("passgate/config.toml"))
}

fn default_window_start() -> String {
    "08:00".to_string()
}

fn default_window_end() -> String {
    "22:00".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("passgate.db")
}
