//! Connection configuration for the telemetry platform.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use lorawatch_types::{Device, Project};

/// Immutable connection settings for the telemetry platform.
///
/// Loaded once at startup and handed to the components that need it; there
/// is no process-wide configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the telemetry platform API.
    pub url: String,
    /// Access token, sent as a query parameter on every request.
    ///
    /// An empty token is a configuration error but not a fatal one: loading
    /// succeeds and the first request fails authentication instead.
    #[serde(default)]
    pub token: String,
    /// Optional HTTP proxy applied uniformly to every outbound request.
    #[serde(default)]
    pub proxy: Option<String>,
    /// Cache freshness window in milliseconds.
    #[serde(default = "default_cache_timeout")]
    pub cache_timeout: u64,
}

fn default_cache_timeout() -> u64 {
    60_000
}

impl ConnectionConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(default_config_path())
    }

    /// The cache freshness window as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_timeout)
    }

    /// Log the connection settings with the token masked.
    pub fn log_summary(&self) {
        info!("url: {}", self.url);
        info!("proxy: {}", self.proxy.as_deref().unwrap_or("NONE"));
        if self.token.is_empty() {
            error!("Missing access token in configuration; requests will fail authentication");
        } else {
            info!("token: *****");
        }
    }

    /// URL of the project-list endpoint.
    pub fn project_url(&self) -> String {
        format!("{}/project/get?token={}", self.url, self.token)
    }

    /// URL of the device-list endpoint for one project.
    pub fn device_url(&self, project: &Project) -> String {
        format!(
            "{}/device/get/{}?token={}",
            self.url, project.project_id, self.token
        )
    }

    /// URL of the latest-message endpoint for one device (limit = 1).
    pub fn message_url(&self, device: &Device) -> String {
        format!(
            "{}/message/get/{}?limit=1&token={}",
            self.url, device.dev_eui, self.token
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lorawatch")
        .join("config.toml")
}
