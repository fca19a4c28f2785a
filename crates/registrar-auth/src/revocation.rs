//! Per-subject revocation markers for refresh tokens.
//!
//! A marker is a monotonically increasing generation counter. Every refresh
//! token records the generation current when it was minted; revoking a
//! subject bumps the counter, which invalidates every refresh token minted
//! before the call and none minted after it. Markers only ever advance.
//!
//! Access tokens are never checked here. They expire quickly enough that
//! revocation takes effect for them at the end of their TTL.

use async_trait::async_trait;
use dashmap::DashMap;
use registrar_core::SubjectId;
use tracing::debug;

use crate::error::StoreError;

/// Shared, process-wide record of revocation generations.
///
/// Implementations must make `revoke` atomic per subject so that concurrent
/// readers never observe a partially written marker. Subjects are independent;
/// no cross-subject locking is required.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Current generation for `subject_id`; zero if the subject was never revoked.
    async fn current_generation(&self, subject_id: SubjectId) -> Result<u64, StoreError>;

    /// Advances the subject's marker and returns the new generation.
    async fn revoke(&self, subject_id: SubjectId) -> Result<u64, StoreError>;

    /// True if a token minted under `token_generation` predates the current marker.
    async fn is_revoked(
        &self,
        subject_id: SubjectId,
        token_generation: u64,
    ) -> Result<bool, StoreError> {
        Ok(token_generation < self.current_generation(subject_id).await?)
    }
}

/// In-process store. Markers do not survive a restart and are not shared
/// between replicas.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    markers: DashMap<SubjectId, u64>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn current_generation(&self, subject_id: SubjectId) -> Result<u64, StoreError> {
        Ok(self.markers.get(&subject_id).map(|g| *g).unwrap_or(0))
    }

    async fn revoke(&self, subject_id: SubjectId) -> Result<u64, StoreError> {
        // The entry guard holds the shard lock for the whole increment.
        let mut generation = self.markers.entry(subject_id).or_insert(0);
        *generation += 1;
        debug!(subject_id, generation = *generation, "Revocation marker advanced");
        Ok(*generation)
    }
}
