//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use forum_core::services::DEFAULT_PAGE_SIZE;
use forum_infra::{DatabaseConfig, UserServiceConfig};

#[cfg(feature = "redis")]
use forum_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory storage gateway.
    pub database: Option<DatabaseConfig>,
    pub page_size: u64,
    pub view_cache_ttl: Duration,
    /// `None` keeps the view cache and invalidation pub/sub in process.
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    pub user_service: UserServiceConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
                min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
                ..defaults
            }
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(3000),
            database,
            page_size: parsed("POSTS_PAGE_SIZE").unwrap_or(DEFAULT_PAGE_SIZE).max(1),
            view_cache_ttl: Duration::from_secs(parsed("VIEW_CACHE_TTL_SECS").unwrap_or(60)),
            #[cfg(feature = "redis")]
            redis: env::var("REDIS_URL").ok().map(|_| RedisConfig::from_env()),
            user_service: UserServiceConfig::from_env(),
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
