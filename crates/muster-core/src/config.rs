//! Configuration management for muster.
//!
//! Loads configuration from ${MUSTER_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
pub fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

fn default_export_path() -> String {
    Config::DEFAULT_EXPORT_PATH.to_string()
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the attendance backend.
    ///
    /// The `MUSTER_BACKEND_URL` environment variable takes precedence over
    /// this value at request time.
    pub backend_url: Option<String>,

    /// Default output path for exported attendance reports.
    #[serde(default = "default_export_path")]
    pub export_path: String,

    /// Log filter directive used when `MUSTER_LOG` is not set (e.g. "info").
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            export_path: default_export_path(),
            log_filter: None,
        }
    }
}

impl Config {
    /// Default backend when neither env nor config provide one.
    pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
    const DEFAULT_EXPORT_PATH: &str = "attendance_report.csv";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to the config path if absent.
    ///
    /// Returns true if a new file was created.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn init() -> Result<bool> {
        Self::init_at(&paths::config_path())
    }

    /// Writes the default config template to a specific path if absent.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn init_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(true)
    }
}

pub mod paths {
    //! Path resolution for muster configuration and data directories.
    //!
    //! MUSTER_HOME resolution order:
    //! 1. MUSTER_HOME environment variable (if set)
    //! 2. ~/.config/muster (default)

    use std::path::PathBuf;

    /// Returns the muster home directory.
    ///
    /// Checks MUSTER_HOME env var first, falls back to ~/.config/muster
    pub fn muster_home() -> PathBuf {
        if let Ok(home) = std::env::var("MUSTER_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("muster"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        muster_home().join("config.toml")
    }

    /// Returns the path to the stored session credential file.
    pub fn session_path() -> PathBuf {
        muster_home().join("session.json")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        muster_home().join("logs")
    }
}
