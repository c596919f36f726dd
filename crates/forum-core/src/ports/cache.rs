//! Storage for rendered read views.
//!
//! Values are serialized response payloads keyed as `view:<scope>:<variant>`.
//! Invalidation never targets single keys: it drops a whole scope with
//! [`Cache::delete_prefix`], so a backend must be able to enumerate keys by
//! prefix. A miss or a backend outage both read as `None`; callers fall back
//! to the repository.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    /// Stored payload for `key`, or `None` on a miss or backend failure.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a payload. Entries without a `ttl` live until evicted.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Drop every key under `prefix` and return how many went.
    async fn delete_prefix(&self, prefix: &str) -> Result<usize, CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("view cache unreachable: {0}")]
    Connection(String),

    #[error("view cache command failed: {0}")]
    Operation(String),
}
