//! Application state - shared across all handlers.

use std::sync::Arc;

use forum_core::PostService;
use forum_core::ports::{Cache, PostRepository, PubSub, UserDirectory};
use forum_infra::{HttpUserDirectory, InMemoryCache, InMemoryPostRepository, InMemoryPubSub};

#[cfg(feature = "postgres")]
use forum_infra::{Database, PostgresPostRepository};
#[cfg(feature = "redis")]
use forum_infra::{RedisCache, RedisPubSub};

use crate::config::AppConfig;
use crate::views::ViewCache;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub views: ViewCache,
    pub users: Arc<dyn UserDirectory>,
    pub pubsub: Arc<dyn PubSub>,
}

impl AppState {
    /// Build the application state with the configured adapters, falling back
    /// to in-memory ones for anything unavailable.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let repo = post_repository(config).await;
        let (cache, pubsub) = messaging(config).await?;

        let users = HttpUserDirectory::new(&config.user_service)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        tracing::info!(
            page_size = config.page_size,
            user_service = %config.user_service.base_url,
            "Application state initialized"
        );

        Ok(Self::assemble(
            repo,
            cache,
            pubsub,
            Arc::new(users),
            config.page_size,
            config.view_cache_ttl,
        ))
    }

    pub fn assemble(
        repo: Arc<dyn PostRepository>,
        cache: Arc<dyn Cache>,
        pubsub: Arc<dyn PubSub>,
        users: Arc<dyn UserDirectory>,
        page_size: u64,
        view_ttl: std::time::Duration,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(repo, pubsub.clone(), page_size)),
            views: ViewCache::new(cache, view_ttl),
            users,
            pubsub,
        }
    }

    /// Start evicting cached views whenever a post mutation is announced.
    pub async fn listen_for_invalidation(&self) -> std::io::Result<()> {
        self.views
            .listen(self.pubsub.as_ref())
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))
    }
}

fn in_memory_repository() -> Arc<dyn PostRepository> {
    Arc::new(InMemoryPostRepository::new())
}

#[cfg(feature = "postgres")]
async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repository();
    };

    match Database::connect(db_config).await {
        Ok(db) => {
            let repo: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(db.conn));
            repo
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            in_memory_repository()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Using in-memory post repository");
    in_memory_repository()
}

type Messaging = (Arc<dyn Cache>, Arc<dyn PubSub>);

fn in_memory_messaging() -> Messaging {
    (
        Arc::new(InMemoryCache::new()),
        Arc::new(InMemoryPubSub::default()),
    )
}

#[cfg(feature = "redis")]
async fn messaging(config: &AppConfig) -> std::io::Result<Messaging> {
    let Some(redis) = config.redis.as_ref() else {
        tracing::info!("REDIS_URL not set. Using in-process view cache and pub/sub.");
        return Ok(in_memory_messaging());
    };

    let connected = async {
        let cache = RedisCache::new(redis).await.map_err(|e| e.to_string())?;
        let pubsub = RedisPubSub::new(redis).await.map_err(|e| e.to_string())?;
        Ok::<_, String>((cache, pubsub))
    };

    match connected.await {
        Ok((cache, pubsub)) => {
            let cache: Arc<dyn Cache> = Arc::new(cache);
            let pubsub: Arc<dyn PubSub> = Arc::new(pubsub);
            Ok((cache, pubsub))
        }
        Err(e) if redis.fallback_to_memory => {
            tracing::error!(error = %e, "Redis unavailable. Using in-memory fallback.");
            Ok(in_memory_messaging())
        }
        Err(e) => {
            tracing::error!(error = %e, "Redis unavailable and fallback disabled");
            Err(std::io::Error::other(e))
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn messaging(_config: &AppConfig) -> std::io::Result<Messaging> {
    Ok(in_memory_messaging())
}

#[cfg(test)]
impl AppState {
    /// Fully in-process state around the given repository and user directory.
    pub fn in_memory(repo: Arc<dyn PostRepository>, users: Arc<dyn UserDirectory>) -> Self {
        let (cache, pubsub) = in_memory_messaging();
        Self::assemble(
            repo,
            cache,
            pubsub,
            users,
            forum_core::services::DEFAULT_PAGE_SIZE,
            std::time::Duration::from_secs(60),
        )
    }
}
