//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::storage::{self, BackendKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where account and session state lives
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("locally").to_string_lossy().to_string())
        .unwrap_or_else(|| "./locally_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Settings for `storage::open_backend`
    pub fn backend_config(&self) -> storage::StorageConfig {
        storage::StorageConfig::new(self.backend, expand_home(&self.data_dir))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("locally").join("config.toml")),
            Some(PathBuf::from("./locally.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Storage overrides
        if let Some(data_dir) = var("LOCALLY_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(backend) = var("LOCALLY_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.storage.backend = kind,
                Err(e) => tracing::warn!("Ignoring LOCALLY_STORAGE_BACKEND: {}", e),
            }
        }

        // Logging overrides
        if let Some(level) = var("LOCALLY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("LOCALLY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Replace a leading `~/` with the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Locally Configuration
#
# Environment variables override these settings:
# - LOCALLY_DATA_DIR
# - LOCALLY_STORAGE_BACKEND
# - LOCALLY_LOG_LEVEL
# - LOCALLY_LOG_FORMAT

[storage]
# Where accounts and the current session are kept: file, sqlite or memory
backend = "file"

# Directory for state files
data_dir = "~/.local/share/locally"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.backend, BackendKind::File);
        assert!(
            config.storage.data_dir.ends_with("locally_data")
                || config.storage.data_dir.ends_with("locally")
        );
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.storage.backend, BackendKind::File);
        assert_eq!(config.storage.data_dir, "~/.local/share/locally");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locally.toml");
        std::fs::write(&path, "[storage]\nbackend = \"sqlite\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.backend, BackendKind::Sqlite);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = Config::load(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[storage]\nbackend = \"redis\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LOCALLY_DATA_DIR", "/tmp/locally-test"),
            ("LOCALLY_STORAGE_BACKEND", "memory"),
            ("LOCALLY_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage.data_dir, "/tmp/locally-test");
        assert_eq!(config.storage.backend, BackendKind::Memory);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_bad_backend_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|name| {
            (name == "LOCALLY_STORAGE_BACKEND").then(|| "redis".to_string())
        });
        assert_eq!(config.storage.backend, BackendKind::File);
    }

    #[test]
    fn test_backend_config() {
        let config = StorageConfig {
            backend: BackendKind::Sqlite,
            data_dir: "/var/lib/locally".to_string(),
        };
        let backend = config.backend_config();
        assert_eq!(backend.kind, BackendKind::Sqlite);
        assert_eq!(backend.db_path(), PathBuf::from("/var/lib/locally/locally.db"));
    }
}
