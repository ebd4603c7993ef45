//! Transport configuration types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default port for the TCP transport.
#[cfg(feature = "tcp")]
pub const DEFAULT_TCP_PORT: u16 = 3000;

/// Default port for the HTTP transport.
#[cfg(feature = "http")]
pub const DEFAULT_HTTP_PORT: u16 = 9715;

/// Transport configuration options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// TCP socket transport, one MCP session per connection.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// HTTP transport with JSON-RPC over POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for the JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "tcp")]
impl TcpConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_TCP_PORT,
            host: default_host(),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        {
            return Self::Tcp(TcpConfig::default());
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");
        }
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT` selects the transport; the remaining `MCP_TCP_*` and
    /// `MCP_HTTP_*` variables tune it. Unknown or disabled transports fall
    /// back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let transport = lookup("MCP_TRANSPORT")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match transport.as_str() {
            "" => Self::default(),
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "tcp")]
            "tcp" => Self::Tcp(TcpConfig {
                port: parse_port(lookup("MCP_TCP_PORT"), DEFAULT_TCP_PORT),
                host: lookup("MCP_TCP_HOST").unwrap_or_else(default_host),
            }),
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig {
                port: parse_port(lookup("MCP_HTTP_PORT"), DEFAULT_HTTP_PORT),
                host: lookup("MCP_HTTP_HOST").unwrap_or_else(default_host),
                rpc_path: lookup("MCP_HTTP_PATH").unwrap_or_else(default_rpc_path),
                enable_cors: lookup("MCP_HTTP_CORS")
                    .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
                    .unwrap_or_else(default_cors),
            }),
            other => {
                let fallback = Self::default();
                warn!(
                    "Transport '{}' is unknown or not compiled in, using {}",
                    other,
                    fallback.description()
                );
                fallback
            }
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}", cfg.address()),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}{}", cfg.address(), cfg.rpc_path),
        }
    }
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn parse_port(value: Option<String>, default: u16) -> u16 {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid port '{}', using {}", raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_unset_uses_default() {
        assert_eq!(TransportConfig::from_lookup(lookup(&[])), TransportConfig::default());
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        let config = TransportConfig::from_lookup(lookup(&[("MCP_TRANSPORT", "carrier-pigeon")]));
        assert_eq!(config, TransportConfig::default());
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_stdio_description() {
        let config = TransportConfig::from_lookup(lookup(&[("MCP_TRANSPORT", " STDIO ")]));
        assert_eq!(config, TransportConfig::Stdio);
        assert_eq!(config.description(), "STDIO (standard MCP mode)");
    }

    #[cfg(feature = "tcp")]
    #[test]
    fn test_tcp_from_lookup() {
        let config = TransportConfig::from_lookup(lookup(&[
            ("MCP_TRANSPORT", "tcp"),
            ("MCP_TCP_PORT", "4000"),
            ("MCP_TCP_HOST", "0.0.0.0"),
        ]));
        assert_eq!(
            config,
            TransportConfig::Tcp(TcpConfig {
                port: 4000,
                host: "0.0.0.0".to_string(),
            })
        );
        assert_eq!(config.description(), "TCP on 0.0.0.0:4000");
    }

    #[cfg(feature = "tcp")]
    #[test]
    fn test_invalid_port_uses_default() {
        let config = TransportConfig::from_lookup(lookup(&[
            ("MCP_TRANSPORT", "tcp"),
            ("MCP_TCP_PORT", "not-a-port"),
        ]));
        assert_eq!(config, TransportConfig::Tcp(TcpConfig::default()));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_defaults() {
        let config = TransportConfig::from_lookup(lookup(&[("MCP_TRANSPORT", "http")]));
        let TransportConfig::Http(http) = config else {
            panic!("expected http transport");
        };
        assert_eq!(http.port, DEFAULT_HTTP_PORT);
        assert_eq!(http.rpc_path, "/mcp");
        assert!(http.enable_cors);
        assert_eq!(http.address(), "127.0.0.1:9715");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_cors_disabled() {
        let config = TransportConfig::from_lookup(lookup(&[
            ("MCP_TRANSPORT", "http"),
            ("MCP_HTTP_CORS", "false"),
            ("MCP_HTTP_PATH", "/rpc"),
        ]));
        let TransportConfig::Http(http) = config else {
            panic!("expected http transport");
        };
        assert!(!http.enable_cors);
        assert_eq!(http.rpc_path, "/rpc");
    }
}
