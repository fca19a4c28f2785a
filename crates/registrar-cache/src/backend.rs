//! Selects the revocation store named by [`RevocationConfig`].

use std::sync::Arc;

use registrar_auth::{InMemoryRevocationStore, RevocationStore};
use registrar_config::{RevocationBackend, RevocationConfig};
use tracing::{info, warn};

use crate::store::{CacheError, RedisRevocationStore};

/// Builds the configured store.
///
/// The in-memory store is only correct for a single long-lived process: its
/// generations reset on restart, which makes revoked refresh tokens valid
/// again. Use Redis for any deployment that must honour revocation across
/// restarts or replicas.
pub async fn connect_revocation_store(
    config: &RevocationConfig,
) -> Result<Arc<dyn RevocationStore>, CacheError> {
    match &config.backend {
        RevocationBackend::Memory => {
            warn!(
                "Using in-memory revocation store; revocations are lost on restart \
                 and are not shared with other processes"
            );
            Ok(Arc::new(InMemoryRevocationStore::new()))
        }
        RevocationBackend::Redis { url } => {
            let store = RedisRevocationStore::connect(url, &config.key_prefix).await?;
            info!(key_prefix = %config.key_prefix, "Using Redis revocation store");
            Ok(Arc::new(store))
        }
    }
}
