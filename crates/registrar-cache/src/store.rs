//! Redis revocation store for multi-replica deployments.
//!
//! Each subject's generation lives in its own key and is advanced with
//! `INCR`, which Redis applies atomically. Missing keys read as generation zero.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, instrument};

use registrar_auth::{RevocationStore, StoreError};
use registrar_core::SubjectId;

use crate::keys;

/// Revocation store backed by a shared Redis instance.
#[derive(Clone)]
pub struct RedisRevocationStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisRevocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRevocationStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

/// Error type for Redis operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),
}

impl From<CacheError> for StoreError {
    fn from(err: CacheError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl RedisRevocationStore {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid or the server
    /// cannot be reached.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key(&self, subject_id: SubjectId) -> String {
        keys::revocation::by_subject(&self.key_prefix, subject_id)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn current_generation(&self, subject_id: SubjectId) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let key = self.key(subject_id);

        match conn.get::<_, Option<u64>>(&key).await {
            Ok(generation) => Ok(generation.unwrap_or(0)),
            Err(e) => {
                error!(cache.key = %key, error = %e, "Redis GET error");
                Err(CacheError::from(e).into())
            }
        }
    }

    #[instrument(skip(self), fields(cache.operation = "INCR"))]
    async fn revoke(&self, subject_id: SubjectId) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let key = self.key(subject_id);

        let generation = conn.incr::<_, _, u64>(&key, 1u64).await.map_err(|e| {
            error!(cache.key = %key, error = %e, "Redis INCR error");
            StoreError::from(CacheError::from(e))
        })?;

        debug!(cache.key = %key, generation, "Revocation marker advanced");

        Ok(generation)
    }
}
