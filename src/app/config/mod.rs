use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub mod user;

pub use user::UserConfig;

use super::cli::Args;

pub struct AppConfig;

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mocmarks")
    }

    /// Database and log files live here
    pub fn get_data_dir() -> PathBuf {
        dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mocmarks")
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn default_database_path() -> PathBuf {
        Self::get_data_dir().join("bookmarks.sqlite")
    }

    /// Load `path` (or the default location), writing defaults if it is missing.
    pub fn load(path: Option<&Path>) -> Result<UserConfig> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::get_config_path);

        if !config_path.exists() {
            let config = UserConfig::default();
            // Best effort: a read-only home still gets a working default
            if let Some(parent) = config_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(content) = toml::to_string_pretty(&config) {
                let _ = fs::write(&config_path, content);
            }
            return Ok(config);
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))
    }

    /// Like `load`, but a broken file falls back to defaults. The second
    /// value describes what went wrong, for the startup toast.
    pub fn load_or_default(path: Option<&Path>) -> (UserConfig, Option<String>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => {
                tracing::warn!("{:#}; using default settings", e);
                (UserConfig::default(), Some(format!("⚠ {}; using defaults", e)))
            }
        }
    }

    pub fn parse(content: &str) -> Result<UserConfig> {
        Ok(toml::from_str(content)?)
    }

    /// Command line and environment beat the file.
    pub fn apply_args(config: &mut UserConfig, args: &Args) {
        if let Some(db) = &args.db {
            config.database_path = db.to_string_lossy().to_string();
        }
        if let Some(player) = &args.player {
            config.player_binary = player.clone();
        }
    }

    pub fn database_path(config: &UserConfig) -> PathBuf {
        if config.database_path.trim().is_empty() {
            return Self::default_database_path();
        }
        expand_home(config.database_path.trim())
    }
}

/// `~/x` -> `$HOME/x`
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
