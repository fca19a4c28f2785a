use std::env;

use crate::{ConfigError, parse_or};

const MIN_SECRET_LEN: usize = 32;
/// One year.
const MAX_TOKEN_TTL: i64 = 365 * 24 * 3600;

/// Signing configuration for access and refresh tokens.
///
/// # Environment Variables
///
/// - `JWT_ACCESS_SECRET`: secret for access tokens (required, at least 32 bytes)
/// - `JWT_REFRESH_SECRET`: secret for refresh tokens (required, at least 32 bytes,
///   must differ from the access secret)
/// - `JWT_ACCESS_EXPIRY`: access token lifetime in seconds (default: `900`)
/// - `JWT_REFRESH_EXPIRY`: refresh token lifetime in seconds (default: `604800`)
///
/// Both lifetimes are capped at one year.
/// - `JWT_ISSUER`: value of the `iss` claim (default: `registrar`)
/// - `JWT_LEEWAY`: clock skew tolerated on expiry, in seconds (default: `0`)
#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub issuer: String,
    pub leeway: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("issuer", &self.issuer)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            access_secret: lookup("JWT_ACCESS_SECRET")
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing("JWT_ACCESS_SECRET"))?,
            refresh_secret: lookup("JWT_REFRESH_SECRET")
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing("JWT_REFRESH_SECRET"))?,
            access_token_expiry: parse_or(&lookup, "JWT_ACCESS_EXPIRY", 900)?, // 15 minutes
            refresh_token_expiry: parse_or(&lookup, "JWT_REFRESH_EXPIRY", 604800)?, // 7 days
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "registrar".to_string()),
            leeway: parse_or(&lookup, "JWT_LEEWAY", 0)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                var: "JWT_ACCESS_SECRET",
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        if self.refresh_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_SECRET",
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_SECRET",
                reason: "must differ from JWT_ACCESS_SECRET".to_string(),
            });
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_ACCESS_EXPIRY",
                reason: "must be positive".to_string(),
            });
        }
        if self.refresh_token_expiry > MAX_TOKEN_TTL {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_EXPIRY",
                reason: format!("must not exceed {MAX_TOKEN_TTL} seconds"),
            });
        }
        if self.refresh_token_expiry <= self.access_token_expiry {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_EXPIRY",
                reason: "must be longer than JWT_ACCESS_EXPIRY".to_string(),
            });
        }
        Ok(())
    }
}
