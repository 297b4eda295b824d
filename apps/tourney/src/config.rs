//! # Configuration
//!
//! Tourney reads a small TOML file from the user's config directory:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [database]
//! path = "/somewhere/tourney.db"   # optional
//! ```
//!
//! ## Resolution
//!
//! The config file is located by, in order: the `--config` flag,
//! `TOURNEY_CONFIG`, `$XDG_CONFIG_HOME/tourney/config.toml`, then
//! `$HOME/.config/tourney/config.toml`. A missing file is created from the
//! embedded default on first run.
//!
//! Without `database.path` the database lives in the cache directory
//! (`$XDG_CACHE_HOME` or `$HOME/.cache`) under `tourney/tourney.db`.

use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tourney_core::TourneyError;

/// Directory name used under the config and cache roots.
pub const APP_DIR: &str = "tourney";

/// File name of the config file.
pub const CONFIG_FILE: &str = "config.toml";

/// File name of the default database.
pub const DATABASE_FILE: &str = "tourney.db";

/// File name of the log written while the terminal UI owns the screen.
pub const LOG_FILE: &str = "tourney.log";

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "TOURNEY_CONFIG";

/// Config written on first run.
pub const DEFAULT_CONFIG: &str = include_str!("../config.toml");

// =============================================================================
// CONFIG STRUCTURE
// =============================================================================

/// Parsed configuration file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

/// `[server]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// `[database]` table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, TourneyError> {
        toml::from_str(text).map_err(|e| TourneyError::Config(e.to_string()))
    }

    /// Load the config at `path`, writing the default first if it is missing.
    pub fn load_or_init(path: &Path) -> Result<Self, TourneyError> {
        if write_default_if_missing(path)? {
            tracing::info!("Wrote default config to {}", path.display());
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            TourneyError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            TourneyError::Config(msg) => {
                TourneyError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Database location: the configured path, or the cache directory.
    pub fn database_path(&self) -> Result<PathBuf, TourneyError> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => cache_dir().map(|dir| dir.join(DATABASE_FILE)),
        }
    }

    /// `host:port` the web server binds to. IPv6 literals are bracketed.
    pub fn server_addr(&self) -> String {
        let host = self.server.host.as_str();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, self.server.port)
        } else {
            format!("{}:{}", host, self.server.port)
        }
    }
}

/// Write the embedded default config to `path` unless a file already exists.
///
/// Returns whether a file was written.
pub fn write_default_if_missing(path: &Path) -> Result<bool, TourneyError> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            TourneyError::Io(format!("Cannot create '{}': {}", parent.display(), e))
        })?;
    }

    std::fs::write(path, DEFAULT_CONFIG).map_err(|e| {
        TourneyError::Io(format!("Cannot write config '{}': {}", path.display(), e))
    })?;
    Ok(true)
}

// =============================================================================
// PATH RESOLUTION
// =============================================================================

/// Locate the config file. An explicit path always wins.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, TourneyError> {
    resolve_config_path_with(explicit, &|key| std::env::var_os(key))
}

/// `tourney` directory under the user's cache root.
pub fn cache_dir() -> Result<PathBuf, TourneyError> {
    base_dir(&|key| std::env::var_os(key), "XDG_CACHE_HOME", ".cache")
        .map(|dir| dir.join(APP_DIR))
}

fn resolve_config_path_with(
    explicit: Option<&Path>,
    env_lookup: &impl Fn(&str) -> Option<OsString>,
) -> Result<PathBuf, TourneyError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env_lookup(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    base_dir(env_lookup, "XDG_CONFIG_HOME", ".config")
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `$<xdg_var>` if set and absolute, otherwise `$HOME/<home_fallback>`.
fn base_dir(
    env_lookup: &impl Fn(&str) -> Option<OsString>,
    xdg_var: &str,
    home_fallback: &str,
) -> Result<PathBuf, TourneyError> {
    if let Some(dir) = env_lookup(xdg_var)
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
    {
        return Ok(dir);
    }

    env_lookup("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(home_fallback))
        .ok_or_else(|| {
            TourneyError::Config(format!("neither {} nor HOME is set", xdg_var))
        })
}

// =============================================================================
// TESTS
// =============================================================================
