//! Configuration for the API timeline
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (timeline.toml)
//! - Environment variables (TIMELINE_*)
//!
//! ## Example config file (timeline.toml):
//! ```toml
//! [store]
//! root = "output/raw"
//! pattern = "paper-api-{version}.json"
//!
//! [output]
//! format = "pretty"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the timeline
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimelineConfig {
    /// Snapshot store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Snapshot store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the snapshot documents
    #[serde(default = "default_store_root")]
    pub root: PathBuf,

    /// Document filename pattern; `{version}` is replaced with the release
    /// identifier
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format for report documents
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

fn default_store_root() -> PathBuf {
    PathBuf::from("output/raw")
}

fn default_pattern() -> String {
    format!("api-{}.json", crate::store::VERSION_PLACEHOLDER)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            pattern: default_pattern(),
        }
    }
}

impl TimelineConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["timeline.toml", ".timeline.toml", "config/timeline.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "api-timeline", "timeline") {
            let xdg_config = config_dir.config_dir().join("timeline.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (TIMELINE_*)
        builder = builder.add_source(
            Environment::with_prefix("TIMELINE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get the store root (resolves relative paths)
    pub fn store_root(&self) -> PathBuf {
        if self.store.root.is_absolute() {
            self.store.root.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.store.root)
        }
    }
}
