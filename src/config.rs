//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub bundle: BundleConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Active bundle configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BundleConfig {
    /// Bundle directory or metrics file the tool reads by default
    pub path: Option<PathBuf>,
}

/// Telemetry catalog source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,

    #[serde(default = "default_catalog_timeout")]
    pub request_timeout_ms: u64,
}

fn default_catalog_url() -> String {
    crate::catalog::CatalogConfig::default().url
}

fn default_catalog_timeout() -> u64 {
    crate::catalog::CatalogConfig::default().request_timeout_ms
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            request_timeout_ms: default_catalog_timeout(),
        }
    }
}

/// Query behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    #[serde(default = "default_proxy_prefix")]
    pub proxy_prefix: String,
}

fn default_proxy_prefix() -> String {
    crate::query::PROXY_METRIC_PREFIX.to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            proxy_prefix: default_proxy_prefix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
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
            default_config_path(),
            Some(PathBuf::from("/etc/debrief/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
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

    /// Persist this configuration to the platform config location
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = default_config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Persist this configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Catalog client settings derived from this configuration
    pub fn catalog_client_config(&self) -> crate::catalog::CatalogConfig {
        crate::catalog::CatalogConfig {
            url: self.catalog.url.clone(),
            request_timeout_ms: self.catalog.request_timeout_ms,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("DEBRIEF_BUNDLE_PATH") {
            self.bundle.path = Some(PathBuf::from(path));
        }

        if let Ok(url) = std::env::var("DEBRIEF_CATALOG_URL") {
            self.catalog.url = url;
        }

        if let Ok(level) = std::env::var("DEBRIEF_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DEBRIEF_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Platform config file location: `<config dir>/debrief/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("debrief").join("config.toml"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("No config directory available on this platform")]
    NoConfigDir,
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Debrief Configuration
#
# Environment variables override these settings:
# - DEBRIEF_BUNDLE_PATH
# - DEBRIEF_CATALOG_URL
# - DEBRIEF_LOG_LEVEL
# - DEBRIEF_LOG_FORMAT

[bundle]
# Active debug bundle: a directory containing metrics.json, or a direct
# path to a metrics file
# path = "./bundles/agent-debug-2023-10-23"

[catalog]
# Telemetry reference document used for validation and unit/type lookup
url = "https://raw.githubusercontent.com/hashicorp/consul/main/website/content/docs/agent/telemetry.mdx"

# Request timeout in milliseconds
request_timeout_ms = 5000

[query]
# Metric-name prefix exempt from catalog validation
proxy_prefix = "envoy."

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.bundle.path.is_none());
        assert!(config.catalog.url.starts_with("https://"));
        assert_eq!(config.query.proxy_prefix, "envoy.");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "[bundle]\npath = \"/tmp/bundle\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.bundle.path, Some(PathBuf::from("/tmp/bundle")));
        assert_eq!(config.catalog.request_timeout_ms, 5000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.bundle.path = Some(PathBuf::from("/var/bundles/latest"));
        config.catalog.request_timeout_ms = 1234;
        config.save_to(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.bundle.path, Some(PathBuf::from("/var/bundles/latest")));
        assert_eq!(reloaded.catalog.request_timeout_ms, 1234);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not toml [").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_generated_template_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.query.proxy_prefix, "envoy.");
    }
}
