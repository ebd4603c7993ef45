//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domains::komodo::KomodoError;

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Tools domain configuration.
    pub tools: ToolsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Komodo connection settings.
    pub komodo: KomodoConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the tools domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// How tools are presented to clients.
    pub mode: ToolMode,
}

/// Tool presentation mode.
///
/// Both presentations share the same operation logic; only the number of
/// advertised tools changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// One tool per remote operation (`list_servers`, `create_server`, ...).
    #[default]
    Operations,
    /// One hub tool per domain with an `operation` discriminator.
    Hub,
    /// Both of the above.
    All,
}

impl ToolMode {
    /// Parse a mode name. Accepts `consolidated` for hub and `both` for all.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "operations" | "operation" | "per-operation" => Some(Self::Operations),
            "hub" | "hubs" | "consolidated" => Some(Self::Hub),
            "all" | "both" => Some(Self::All),
            _ => None,
        }
    }

    pub fn includes_operations(self) -> bool {
        matches!(self, Self::Operations | Self::All)
    }

    pub fn includes_hubs(self) -> bool {
        matches!(self, Self::Hub | Self::All)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` and `MCP_LOG_TIMESTAMPS` (after loading `.env`).
    ///
    /// Separate from [`Config::from_env`] so logging can be set up before
    /// the rest of the configuration emits warnings.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut logging = Self::default();
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }
        if let Ok(value) = std::env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = !matches!(value.trim().to_lowercase().as_str(), "false" | "0");
        }
        logging
    }
}

/// Connection settings for the Komodo core.
///
/// All three values are required before any tool can reach the API.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct KomodoConfig {
    /// Base URL of the Komodo core (e.g. `https://komodo.example.com`).
    pub url: Option<String>,

    /// API key.
    pub key: Option<String>,

    /// API secret.
    pub secret: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for KomodoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KomodoConfig")
            .field("url", &self.url)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl KomodoConfig {
    /// Create a complete configuration.
    pub fn new(
        url: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            key: Some(key.into()),
            secret: Some(secret.into()),
        }
    }

    /// Names of the environment variables whose values are missing or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("KOMODO_URL", &self.url),
            ("KOMODO_KEY", &self.key),
            ("KOMODO_SECRET", &self.secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Borrow `(url, key, secret)`, or fail naming what is missing.
    pub fn credentials(&self) -> Result<(&str, &str, &str), KomodoError> {
        match (&self.url, &self.key, &self.secret) {
            (Some(url), Some(key), Some(secret)) if self.is_complete() => {
                Ok((url.as_str(), key.as_str(), secret.as_str()))
            }
            _ => Err(KomodoError::config(self.missing())),
        }
    }

    /// Read `KOMODO_URL`, `KOMODO_KEY` and `KOMODO_SECRET`.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("KOMODO_URL").ok(),
            key: std::env::var("KOMODO_KEY").ok(),
            secret: std::env::var("KOMODO_SECRET").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "komodo-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            tools: ToolsConfig::default(),
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            komodo: KomodoConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TOOL_MODE`, `MCP_TRANSPORT`...). Komodo
    /// credentials use `KOMODO_URL`, `KOMODO_KEY` and `KOMODO_SECRET`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        if let Ok(mode) = std::env::var("MCP_TOOL_MODE") {
            match ToolMode::parse(&mode) {
                Some(mode) => config.tools.mode = mode,
                None => warn!(
                    "Unknown MCP_TOOL_MODE '{}', falling back to {:?}",
                    mode, config.tools.mode
                ),
            }
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.komodo = KomodoConfig::from_env();
        let missing = config.komodo.missing();
        if missing.is_empty() {
            info!("Komodo credentials loaded from environment");
        } else {
            warn!(
                "Missing Komodo settings: {}. Tool calls will fail until they are set.",
                missing.join(", ")
            );
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_komodo_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("KOMODO_URL", "http://komodo.test:9120");
            std::env::set_var("KOMODO_KEY", "test_key");
            std::env::set_var("KOMODO_SECRET", "test_secret");
        }
        let config = Config::from_env();
        assert_eq!(config.komodo.url.as_deref(), Some("http://komodo.test:9120"));
        assert!(config.komodo.is_complete());
        unsafe {
            std::env::remove_var("KOMODO_URL");
            std::env::remove_var("KOMODO_KEY");
            std::env::remove_var("KOMODO_SECRET");
        }
    }

    #[test]
    fn test_tool_mode_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TOOL_MODE", "consolidated");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.mode, ToolMode::Hub);

        unsafe {
            std::env::set_var("MCP_TOOL_MODE", "nonsense");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.mode, ToolMode::Operations);

        unsafe {
            std::env::remove_var("MCP_TOOL_MODE");
        }
    }

    #[test]
    fn test_tool_mode_parse() {
        assert_eq!(ToolMode::parse("operations"), Some(ToolMode::Operations));
        assert_eq!(ToolMode::parse(" HUB "), Some(ToolMode::Hub));
        assert_eq!(ToolMode::parse("both"), Some(ToolMode::All));
        assert_eq!(ToolMode::parse("x"), None);

        assert!(ToolMode::All.includes_hubs());
        assert!(ToolMode::All.includes_operations());
        assert!(!ToolMode::Hub.includes_operations());
        assert!(!ToolMode::Operations.includes_hubs());
    }

    #[test]
    fn test_missing_treats_blank_as_absent() {
        let config = KomodoConfig {
            url: Some("   ".to_string()),
            key: Some("k".to_string()),
            secret: None,
        };
        assert_eq!(config.missing(), vec!["KOMODO_URL", "KOMODO_SECRET"]);
        assert!(config.credentials().is_err());
    }

    #[test]
    fn test_credentials_complete() {
        let config = KomodoConfig::new("http://komodo", "k", "s");
        assert_eq!(config.credentials().unwrap(), ("http://komodo", "k", "s"));
    }

    #[test]
    fn test_komodo_redacted_in_debug() {
        let config = KomodoConfig::new("http://komodo", "super_secret_key", "hidden_secret");
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(debug_str.contains("http://komodo"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(!debug_str.contains("hidden_secret"));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.name, "komodo-mcp-server");
        assert_eq!(config.tools.mode, ToolMode::Operations);
        assert!(!config.komodo.is_complete());
    }
}
