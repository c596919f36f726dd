//! # Forum Infrastructure
//!
//! Concrete implementations of the ports defined in `forum-core`.
//! This crate contains database, cache, pub/sub, and user-service integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage gateway via SeaORM
//! - `redis` - Redis support for the view cache and invalidation pub/sub

pub mod cache;
pub mod database;
pub mod pubsub;
pub mod users;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use database::{DatabaseConfig, InMemoryPostRepository};
pub use pubsub::InMemoryPubSub;
pub use users::{HttpUserDirectory, UserServiceConfig};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{Database, PostgresPostRepository};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
#[cfg(feature = "redis")]
pub use pubsub::RedisPubSub;
