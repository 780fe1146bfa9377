//! Configuration loading
//!
//! Values are resolved with the following priority (highest first):
//! 1. Environment variables (`CLIP_FEED_USER`, `CLIP_FEED_EVENT`, `CLIP_FEED_FEED`)
//! 2. TOML file at `$XDG_CONFIG_HOME/clip-feed/config.toml`
//! 3. Defaults
//!
//! ```toml
//! user = "alice"
//! event = "Summer Fest"
//! feed_path = "feed.json"
//! store_path = ".cache/likes.json"
//! cell_pool_size = 3
//! clip_duration_secs = 8
//! store_latency_ms = 300
//! tick_ms = 50
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const CONFIG_DIR: &str = "clip-feed";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Signed-in user; the default identity is used when unset
    pub user: Option<String>,
    /// Only show clips of this event
    pub event: Option<String>,
    pub feed_path: PathBuf,
    pub store_path: PathBuf,
    /// Number of reusable cells, which is also the number bound at once
    pub cell_pool_size: usize,
    pub clip_duration_secs: u64,
    /// Artificial delay added to every store call
    pub store_latency_ms: u64,
    pub tick_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            user: None,
            event: None,
            feed_path: PathBuf::from("feed.json"),
            store_path: PathBuf::from(".cache/likes.json"),
            cell_pool_size: 3,
            clip_duration_secs: 8,
            store_latency_ms: 300,
            tick_ms: 50,
        }
    }
}

impl FeedConfig {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, the environment and defaults
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "Config file loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from environment variables looked up through `var`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(user) = var("CLIP_FEED_USER") {
            self.user = Some(user);
        }
        if let Some(event) = var("CLIP_FEED_EVENT") {
            self.event = Some(event).filter(|e| !e.is_empty());
        }
        if let Some(feed) = var("CLIP_FEED_FEED") {
            self.feed_path = PathBuf::from(feed);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_pool_size == 0 {
            return Err(ConfigError::ValidationError(
                "cell_pool_size must be at least 1".to_string(),
            ));
        }
        if self.clip_duration_secs == 0 {
            return Err(ConfigError::ValidationError(
                "clip_duration_secs must be at least 1".to_string(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn clip_duration(&self) -> Duration {
        Duration::from_secs(self.clip_duration_secs)
    }

    pub fn store_latency(&self) -> Duration {
        Duration::from_millis(self.store_latency_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
