use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use registrar_auth::{RevocationStore, TokenCodec, TokenIntrospector, TokenIssuer};
use registrar_cache::connect_revocation_store;
use registrar_config::{CorsConfig, JwtConfig, RevocationConfig};

use crate::middleware::role::RolePolicy;
use crate::policy::default_role_policy;

/// Shared state handed to every guard and handler.
///
/// Token verification and the revocation store are reachable only through
/// the guards and [`AppState::issuer`].
#[derive(Clone)]
pub struct AppState {
    pub(crate) introspector: TokenIntrospector,
    pub(crate) issuer: TokenIssuer,
    pub(crate) role_policy: Arc<RolePolicy>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        jwt_config: &JwtConfig,
        store: Arc<dyn RevocationStore>,
        store_timeout: Duration,
        role_policy: RolePolicy,
        cors_config: CorsConfig,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(jwt_config));

        Self {
            introspector: TokenIntrospector::new(codec.clone(), store.clone(), store_timeout),
            issuer: TokenIssuer::new(codec, store, store_timeout),
            role_policy: Arc::new(role_policy),
            cors_config,
        }
    }

    /// Token issuance for collaborators that authenticate credentials.
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }
}

/// Builds state from the environment. Any configuration error is fatal.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env().context("Invalid JWT configuration")?;
    let revocation_config =
        RevocationConfig::from_env().context("Invalid revocation store configuration")?;
    let store = connect_revocation_store(&revocation_config)
        .await
        .context("Failed to connect revocation store")?;

    Ok(AppState::new(
        &jwt_config,
        store,
        revocation_config.timeout,
        default_role_policy(),
        CorsConfig::from_env(),
    ))
}
