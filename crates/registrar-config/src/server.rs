use std::env;
use std::net::SocketAddr;

use crate::ConfigError;

/// # Environment Variables
///
/// - `BIND_ADDR`: Listen address (default: `0.0.0.0:3000`)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let bind_addr = raw.trim().parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: e.to_string(),
            }
        })?;

        Ok(Self { bind_addr })
    }
}
