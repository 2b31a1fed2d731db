//! Transport selection.
//!
//! `MCP_TRANSPORT=http` picks the HTTP transport when that feature is built
//! in. Anything else, or no value, falls back to the default transport.

use serde::{Deserialize, Serialize};

/// Which transport serves the prompt store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// One MCP session over stdin/stdout.
    #[cfg(feature = "stdio")]
    Stdio,

    /// Stateless JSON-RPC over HTTP POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP listener settings.
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Path of the JSON-RPC endpoint.
    pub rpc_path: String,
    pub enable_cors: bool,
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rpc_path: "/mcp".to_string(),
            enable_cors: true,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            Self::Stdio
        }

        #[cfg(all(not(feature = "stdio"), feature = "http"))]
        {
            Self::Http(HttpConfig::default())
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

impl TransportConfig {
    /// Read the transport selection from `MCP_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let transport = lookup("MCP_TRANSPORT").unwrap_or_default().to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "http")]
            "http" => {
                let mut http = HttpConfig::default();
                if let Some(host) = lookup("MCP_HTTP_HOST") {
                    http.host = host;
                }
                if let Some(port) = lookup("MCP_HTTP_PORT").and_then(|p| p.parse().ok()) {
                    http.port = port;
                }
                if let Some(path) = lookup("MCP_HTTP_PATH") {
                    http.rpc_path = path;
                }
                if let Some(cors) = lookup("MCP_HTTP_CORS") {
                    http.enable_cors = !matches!(cors.to_lowercase().as_str(), "false" | "0");
                }
                Self::Http(http)
            }
            _ => Self::default(),
        }
    }

    /// Human-readable description for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }
}
