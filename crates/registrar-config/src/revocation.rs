//! Revocation store configuration.

use std::env;
use std::time::Duration;

use crate::{ConfigError, parse_or};

/// Where per-subject revocation markers live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevocationBackend {
    /// Process-local store; markers are lost on restart.
    Memory,
    /// Shared Redis instance, required when running more than one replica.
    Redis { url: String },
}

/// # Environment Variables
///
/// - `REVOCATION_BACKEND`: `memory` or `redis` (default: `memory`)
/// - `REDIS_URL`: Redis connection URL (default: `redis://127.0.0.1:6379`)
/// - `REVOCATION_KEY_PREFIX`: Prefix for marker keys (default: `registrar`)
/// - `REVOCATION_TIMEOUT_MS`: Upper bound for a single store call (default: `250`)
#[derive(Clone, Debug)]
pub struct RevocationConfig {
    pub backend: RevocationBackend,
    pub key_prefix: String,
    pub timeout: Duration,
}

impl RevocationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("REVOCATION_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => RevocationBackend::Memory,
            "redis" => RevocationBackend::Redis {
                url: lookup("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".into()),
            },
            other => {
                return Err(ConfigError::Invalid {
                    var: "REVOCATION_BACKEND",
                    reason: format!("expected `memory` or `redis`, got `{other}`"),
                });
            }
        };

        let timeout_ms: u64 = parse_or(&lookup, "REVOCATION_TIMEOUT_MS", 250)?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "REVOCATION_TIMEOUT_MS",
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            backend,
            key_prefix: lookup("REVOCATION_KEY_PREFIX").unwrap_or_else(|| "registrar".into()),
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Build a prefixed key.
    ///
    /// ```ignore
    /// let key = config.prefixed_key("revocation:42");
    /// // Returns "registrar:revocation:42"
    /// ```
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            backend: RevocationBackend::Memory,
            key_prefix: "registrar".into(),
            timeout: Duration::from_millis(250),
        }
    }
}
