//! # Registrar Cache
//!
//! Redis-backed storage for the Registrar API.
//!
//! This crate provides:
//! - Redis connection management
//! - [`RedisRevocationStore`], a [`RevocationStore`](registrar_auth::RevocationStore)
//!   shared by every replica of the service
//! - Key generation utilities
//! - [`connect_revocation_store`], which picks the backend from configuration
//!
//! # Example
//!
//! ```ignore
//! use registrar_cache::RedisRevocationStore;
//! use registrar_config::RevocationConfig;
//!
//! let config = RevocationConfig::from_env()?;
//! let store = RedisRevocationStore::connect("redis://127.0.0.1:6379", &config.key_prefix).await?;
//!
//! let generation = store.revoke(42).await?;
//! ```

pub mod backend;
pub mod keys;
pub mod store;

pub use backend::connect_revocation_store;
pub use store::{CacheError, RedisRevocationStore};
