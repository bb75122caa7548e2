//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: USER_SEARCH_, nested keys split on `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/user-search/{service_name}/config.toml
//! 4. System directory: /etc/user-search/{service_name}/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Environment variable prefix for every configuration key
pub const ENV_PREFIX: &str = "USER_SEARCH_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Search server configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Search client configuration
    #[serde(default)]
    pub client: ClientConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            port: default_port(),
            log_level: default_log_level(),
            timeout_secs: default_timeout(),
            environment: default_environment(),
        }
    }
}

impl ServiceConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Search server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Shared secret every request must present in the `AccessToken` header.
    /// Left empty, every request is rejected as unauthorized.
    #[serde(default)]
    pub access_token: String,

    /// Path of the JSON dataset
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Re-read the dataset on every request instead of once at startup
    #[serde(default)]
    pub reload_per_request: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            dataset_path: default_dataset_path(),
            reload_per_request: false,
        }
    }
}

/// Search client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Search endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Access token sent with every request
    #[serde(default)]
    pub access_token: String,

    /// Deadline for a single call, in milliseconds
    #[serde(default = "default_client_timeout_ms")]
    pub timeout_ms: u64,

    /// Largest page the client will ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: String::new(),
            timeout_ms: default_client_timeout_ms(),
            max_limit: default_max_limit(),
        }
    }
}

impl ClientConfig {
    /// Call deadline as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// Default value functions
fn default_service_name() -> String {
    "user-search".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset.json")
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/".to_string()
}

fn default_client_timeout_ms() -> u64 {
    1000
}

fn default_max_limit() -> i64 {
    crate::client::MAX_PAGE_SIZE
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found is used):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/user-search/{service_name}/config.toml
    /// 3. System directory: /etc/user-search/{service_name}/config.toml
    ///
    /// Environment variables (USER_SEARCH_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        Self::load_for_service(&default_service_name())
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses XDG directories and loads directly from the given path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Find all possible config file paths for a service, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix("user-search");
        if let Some(path) = xdg_dirs.find_config_file(Path::new(service_name).join("config.toml")) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc/user-search")
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.search.dataset_path, PathBuf::from("dataset.json"));
        assert!(config.search.access_token.is_empty());
        assert_eq!(config.client.timeout(), Duration::from_secs(1));
        assert_eq!(config.client.max_limit, 25);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
port = 9191

[search]
access_token = "12345"
reload_per_request = true

[client]
timeout_ms = 250
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.port, 9191);
        assert_eq!(config.service.name, "user-search");
        assert_eq!(config.search.access_token, "12345");
        assert!(config.search.reload_per_request);
        assert_eq!(config.client.timeout_ms, 250);
        assert_eq!(config.client.max_limit, 25);
    }
}
