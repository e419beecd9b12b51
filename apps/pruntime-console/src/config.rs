// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Endpoint configuration is resolved once at startup (flags, then
//! environment, then defaults) and handed to every component as an
//! immutable [`EndpointConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PRUNTIME_ENDPOINT` | pRuntime HTTP API base URL | `http://localhost:8000` |
//! | `SUBSTRATE_WS_ENDPOINT` | Substrate node websocket RPC URL | `ws://localhost:9944` |
//! | `CONSOLE_JSON` | Print results as JSON | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `warn` |

use url::Url;

/// Environment variable name for the pRuntime endpoint.
pub const PRUNTIME_ENDPOINT_ENV: &str = "PRUNTIME_ENDPOINT";

/// Environment variable name for the Substrate websocket endpoint.
pub const SUBSTRATE_WS_ENDPOINT_ENV: &str = "SUBSTRATE_WS_ENDPOINT";

/// Environment variable name for the JSON output switch.
pub const JSON_OUTPUT_ENV: &str = "CONSOLE_JSON";

/// Environment variable name for the log format.
///
/// `json` emits one JSON object per line; anything else is human-readable.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default pRuntime endpoint (a local enclave on its standard port).
pub const DEFAULT_PRUNTIME_ENDPOINT: &str = "http://localhost:8000";

/// Default node websocket endpoint (a local development node).
pub const DEFAULT_SUBSTRATE_WS_ENDPOINT: &str = "ws://localhost:9944";

/// Default `RUST_LOG` filter. Logs go to stderr; keep them quiet so stdout
/// holds only results.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Errors raised while building the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An endpoint URL failed to parse or uses the wrong scheme.
    #[error("Invalid {name} `{value}`: {reason}")]
    InvalidEndpoint {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented `key: value` lines
    Human,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// `Json` when `--json` (or `CONSOLE_JSON`) is set, `Human` otherwise.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Endpoints and output settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pruntime_endpoint: Url,
    substrate_ws_endpoint: Url,
    output: OutputFormat,
}

impl EndpointConfig {
    /// Validate endpoints and build the configuration.
    ///
    /// # Arguments
    /// * `pruntime` - pRuntime HTTP API base URL (`http` or `https`)
    /// * `substrate_ws` - Node websocket RPC URL (`ws` or `wss`)
    /// * `json` - Print results as JSON instead of human-readable text
    ///
    /// # Returns
    /// * `Ok(EndpointConfig)` - Validated configuration
    /// * `Err(ConfigError::InvalidEndpoint)` - If either URL is invalid
    pub fn new(pruntime: &str, substrate_ws: &str, json: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            pruntime_endpoint: parse_endpoint("pRuntime endpoint", pruntime, &["http", "https"])?,
            substrate_ws_endpoint: parse_endpoint(
                "Substrate websocket endpoint",
                substrate_ws,
                &["ws", "wss"],
            )?,
            output: OutputFormat::from_json_flag(json),
        })
    }

    /// Base URL every pRuntime method is appended to.
    pub fn pruntime_endpoint(&self) -> &Url {
        &self.pruntime_endpoint
    }

    /// Websocket URL of the Substrate node.
    pub fn substrate_ws_endpoint(&self) -> &Url {
        &self.substrate_ws_endpoint
    }

    /// How results are printed.
    pub fn output(&self) -> OutputFormat {
        self.output
    }
}

fn parse_endpoint(
    name: &'static str,
    value: &str,
    schemes: &[&str],
) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !schemes.contains(&url.scheme()) {
        return Err(invalid(format!("expected scheme {}", schemes.join(" or "))));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let config = EndpointConfig::new(
            DEFAULT_PRUNTIME_ENDPOINT,
            DEFAULT_SUBSTRATE_WS_ENDPOINT,
            false,
        )
        .unwrap();
        assert_eq!(config.pruntime_endpoint().port(), Some(8000));
        assert_eq!(config.substrate_ws_endpoint().scheme(), "ws");
        assert_eq!(config.output(), OutputFormat::Human);
    }

    #[test]
    fn json_flag_selects_json_output() {
        let config = EndpointConfig::new("https://pr.example", "wss://node.example", true).unwrap();
        assert_eq!(config.output(), OutputFormat::Json);
        assert_eq!(config.pruntime_endpoint().scheme(), "https");
    }

    #[test]
    fn rejects_wrong_schemes() {
        assert!(EndpointConfig::new("ws://localhost:8000", DEFAULT_SUBSTRATE_WS_ENDPOINT, false)
            .is_err());
        assert!(EndpointConfig::new(DEFAULT_PRUNTIME_ENDPOINT, "http://localhost:9944", false)
            .is_err());
        assert!(EndpointConfig::new("not a url", DEFAULT_SUBSTRATE_WS_ENDPOINT, false).is_err());
    }
}
