//! # Registrar Config
//!
//! Configuration types for the Registrar API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Token signing secrets and lifetimes
//! - [`revocation`]: Revocation store backend and timeout
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address
//!
//! Missing or invalid signing configuration is reported as a [`ConfigError`]
//! and is meant to abort process startup.
//!
//! # Example
//!
//! ```ignore
//! use registrar_config::{CorsConfig, JwtConfig, RevocationConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let revocation_config = RevocationConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod revocation;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use revocation::{RevocationBackend, RevocationConfig};
pub use server::ServerConfig;

/// Error raised while loading configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Parses an optional numeric variable, falling back to `default` when unset.
pub(crate) fn parse_or<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
