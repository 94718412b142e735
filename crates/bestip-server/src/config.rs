//! Server configuration
//!
//! Read from environment variables by default:
//! - `BESTIP_BIND` - listen address (default `127.0.0.1:8787`)
//! - `BESTIP_DATA_DIR` - directory for the file store (default `./data`)
//! - `BESTIP_STRICT` - reject malformed rows instead of dropping them
//! - `BESTIP_SERVICE_HEADER` - value of the `X-BestIP-Original` header

use bestip_records::ParseMode;
use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use thiserror::Error;

/// Default listen address
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8787));

/// Default data directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Configuration errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// Listen address did not parse
    #[error("Invalid bind address: {0}")]
    InvalidBind(String),

    /// Boolean flag did not parse
    #[error("Invalid value for {var}: {value} (expected true/false)")]
    InvalidFlag { var: &'static str, value: String },

    /// Header value contains characters HTTP forbids
    #[error("Invalid service header value: {0}")]
    InvalidHeader(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Server settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Root of the file-backed store
    pub data_dir: PathBuf,
    /// Reject malformed rows with a 500 instead of dropping them
    pub strict: bool,
    /// Value of the service identification header
    pub service_header: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup("BESTIP_BIND") {
            config.bind = bind
                .parse()
                .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;
        }

        if let Some(dir) = lookup("BESTIP_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(strict) = lookup("BESTIP_STRICT") {
            config.strict = parse_flag("BESTIP_STRICT", &strict)?;
        }

        if let Some(header) = lookup("BESTIP_SERVICE_HEADER") {
            config.service_header = header;
        }

        Ok(config)
    }

    /// Row handling mode derived from `strict`
    pub fn parse_mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            strict: false,
            service_header: default_service_header(),
        }
    }
}

/// Service name and version sent on every response
pub fn default_service_header() -> String {
    format!("CloudFlare-BestIP-v{}", env!("CARGO_PKG_VERSION"))
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.bind.to_string(), "127.0.0.1:8787");
        assert_eq!(config.parse_mode(), ParseMode::Lenient);
        assert!(config.service_header.starts_with("CloudFlare-BestIP-v"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("BESTIP_BIND", "0.0.0.0:9000"),
            ("BESTIP_DATA_DIR", "/var/lib/bestip"),
            ("BESTIP_STRICT", "true"),
            ("BESTIP_SERVICE_HEADER", "edge-1"),
        ]))
        .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/bestip"));
        assert!(config.strict);
        assert_eq!(config.parse_mode(), ParseMode::Strict);
        assert_eq!(config.service_header, "edge-1");
    }

    #[test]
    fn test_invalid_bind() {
        let err = ServerConfig::from_lookup(lookup_from(&[("BESTIP_BIND", "localhost")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidBind("localhost".to_string()));
    }

    #[test]
    fn test_invalid_flag() {
        let err = ServerConfig::from_lookup(lookup_from(&[("BESTIP_STRICT", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { var: "BESTIP_STRICT", .. }));
    }

    #[test]
    fn test_parse_flag_variants() {
        assert_eq!(parse_flag("X", "ON"), Ok(true));
        assert_eq!(parse_flag("X", "0"), Ok(false));
        assert_eq!(parse_flag("X", ""), Ok(false));
    }
}
