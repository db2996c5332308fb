//! Configuration management for the Canvas MCP server.
//!
//! Configuration is read once at startup from environment variables, after
//! loading a `.env` file if one is present. Missing or invalid Canvas
//! settings abort startup.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::canvas::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Smallest accepted request timeout, in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Largest accepted retry count.
pub const MAX_RETRIES_LIMIT: u32 = 5;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Canvas instance, credentials and request behaviour.
    pub canvas: ClientConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Default lifetime of an entry, in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 300,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// When false, no subscriber is installed and nothing is logged.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "canvas-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            canvas: ClientConfig::new(String::new(), String::new()),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Configuration pointing at `base_url` with `token`, everything else
    /// defaulted.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            canvas: ClientConfig::new(base_url, token),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `CANVAS_API_URL` | required |
    /// | `CANVAS_API_TOKEN` | required |
    /// | `CANVAS_API_VERSION` | `v1` |
    /// | `CANVAS_API_TIMEOUT` | `30000` (ms, at least 1000) |
    /// | `CANVAS_MAX_RETRIES` | `3` (0 to 5) |
    /// | `CACHE_ENABLED` | `true` |
    /// | `CACHE_TTL` | `300` (seconds) |
    /// | `LOG_LEVEL` | `info` |
    /// | `LOGGING_ENABLED` | `true` |
    /// | `MCP_SERVER_NAME` | `canvas-mcp-server` |
    ///
    /// Transport variables (`MCP_TRANSPORT`, ...) are read by
    /// [`TransportConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.canvas = Self::canvas_from_env()?;

        if let Some(enabled) = env_var("CACHE_ENABLED") {
            config.cache.enabled = flag(&enabled);
        }
        if let Some(ttl) = parse_var::<u64>("CACHE_TTL")? {
            config.cache.ttl_secs = ttl;
        }

        if let Some(level) = env_var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(enabled) = env_var("LOGGING_ENABLED") {
            config.logging.enabled = flag(&enabled);
        }

        config.transport = TransportConfig::from_env()?;

        Ok(config)
    }

    fn canvas_from_env() -> Result<ClientConfig> {
        let base_url = env_var("CANVAS_API_URL")
            .ok_or_else(|| Error::config("CANVAS_API_URL is required"))?;
        reqwest::Url::parse(&base_url)
            .map_err(|err| Error::config(format!("CANVAS_API_URL is not a valid URL: {err}")))?;

        let token = env_var("CANVAS_API_TOKEN")
            .ok_or_else(|| Error::config("CANVAS_API_TOKEN is required"))?;

        let api_version =
            env_var("CANVAS_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let timeout_ms = parse_var::<u64>("CANVAS_API_TIMEOUT")?.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms < MIN_TIMEOUT_MS {
            return Err(Error::config(format!(
                "CANVAS_API_TIMEOUT must be at least {MIN_TIMEOUT_MS} ms, got {timeout_ms}"
            )));
        }

        let max_retries = parse_var::<u32>("CANVAS_MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries > MAX_RETRIES_LIMIT {
            return Err(Error::config(format!(
                "CANVAS_MAX_RETRIES must be between 0 and {MAX_RETRIES_LIMIT}, got {max_retries}"
            )));
        }

        Ok(ClientConfig {
            base_url,
            token,
            api_version,
            timeout_ms,
            max_retries,
        })
    }
}

/// Trimmed, non-empty value of an environment variable.
pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|err| Error::config(format!("{name}='{raw}' is invalid: {err}")))
        })
        .transpose()
}

/// Anything but `false` (or `0`) enables a flag.
fn flag(value: &str) -> bool {
    !(value.eq_ignore_ascii_case("false") || value == "0")
}
