//! Gateway configuration
//!
//! Configuration is loaded once at startup from an optional TOML file and the
//! process environment, then frozen into [`ReaderCredentials`] which is the only
//! thing the upstream client ever sees.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://readwise.io/api/v3";
pub const DEFAULT_API_KEY_ENV: &str = "READWISE_API_KEY";

/// Main gateway configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub reader: ReaderSection,
}

/// Identity reported to MCP clients during `initialize`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    #[serde(default = "default_server_name")]
    pub name: String,
    #[serde(default = "default_server_version")]
    pub version: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            version: default_server_version(),
        }
    }
}

fn default_server_name() -> String {
    "readwise-gateway".to_string()
}

fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Upstream Reader API section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReaderSection {
    /// Base URL of the Reader API, without trailing endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable containing the API token
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ReaderSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Resolved, immutable upstream settings
#[derive(Clone, PartialEq)]
pub struct ReaderCredentials {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ReaderCredentials {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(default_timeout_secs()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keeps the token out of logs and panic messages.
impl std::fmt::Debug for ReaderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderCredentials")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Missing API credential: environment variable {0} is not set")]
    MissingCredential(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GatewayConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.reader.base_url)?;

        if self.reader.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "reader.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.reader.api_key_env.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "reader.api_key_env must name an environment variable".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the API token from the environment
    pub fn credentials(&self) -> Result<ReaderCredentials, ConfigError> {
        let api_key = Self::get_env_var_required(&self.reader.api_key_env)?;

        Ok(ReaderCredentials {
            base_url: self.reader.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(self.reader.timeout_secs),
        })
    }

    fn get_env_var_required(env_var_name: &str) -> Result<String, ConfigError> {
        match std::env::var(env_var_name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingCredential(env_var_name.to_string())),
        }
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(base_url).map_err(|e| {
        ConfigError::InvalidConfig(format!("reader.base_url '{base_url}' is not a URL: {e}"))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidConfig(format!(
            "reader.base_url must use http or https, got '{scheme}'"
        ))),
    }
}
