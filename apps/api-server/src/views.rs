//! Cached renderings of the read views, evicted by invalidation events.
//!
//! Every key starts with the prefix of the [`View`] it renders, so one
//! `delete_prefix` per named view drops all of its pages. Each prefix also has
//! a local generation, bumped on eviction, so a read that raced a mutation
//! never writes its stale rendering back.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use forum_core::domain::{INVALIDATION_CHANNEL, InvalidationEvent, View};
use forum_core::ports::{Cache, MessageHandler, PubSub, PubSubError};

#[derive(Clone)]
pub struct ViewCache {
    cache: Arc<dyn Cache>,
    ttl: Duration,
    generations: Arc<Mutex<HashMap<String, u64>>>,
}

impl ViewCache {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            generations: Arc::default(),
        }
    }

    /// Cache key of one rendering (`variant`) of `view`.
    pub fn key(view: &View, variant: &str) -> String {
        format!("{}{variant}", view.cache_prefix())
    }

    /// Serve `variant` of `view` from the cache, or load and cache it.
    ///
    /// The load result is only cached when no eviction of `view` happened
    /// while it ran. Load errors are returned and never cached.
    pub async fn get_or_load<T, E, F, Fut>(&self, view: View, variant: &str, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = Self::key(&view, variant);
        if let Some(hit) = self.get(&key).await {
            return Ok(hit);
        }

        let prefix = view.cache_prefix();
        let generation = self.generation(&prefix);
        let value = load().await?;

        if self.generation(&prefix) != generation {
            tracing::debug!(key = %key, "View invalidated during load; not caching");
            return Ok(value);
        }

        self.put(&key, &value).await;

        // An eviction may have slipped in between the check and the write.
        if self.generation(&prefix) != generation {
            if let Err(e) = self.cache.delete(&key).await {
                tracing::warn!(key = %key, error = %e, "Failed to drop stale view");
            }
        }

        Ok(value)
    }

    /// Drop every cached rendering of the views named by `event`.
    pub async fn evict(&self, event: &InvalidationEvent) {
        for view in &event.views {
            let prefix = view.cache_prefix();
            // Bump first: loads already running must see the change before the delete.
            self.bump(&prefix);

            match self.cache.delete_prefix(&prefix).await {
                Ok(removed) => {
                    tracing::debug!(path = %view.path(), removed, "View invalidated")
                }
                Err(e) => {
                    tracing::warn!(path = %view.path(), error = %e, "Failed to invalidate view")
                }
            }
        }
    }

    /// Subscribe to the invalidation channel and evict on every event.
    ///
    /// Handlers evict their own mutations directly; this covers other instances.
    pub async fn listen(&self, pubsub: &dyn PubSub) -> Result<(), PubSubError> {
        pubsub
            .subscribe(INVALIDATION_CHANNEL, self.invalidation_handler())
            .await
    }

    fn invalidation_handler(&self) -> MessageHandler {
        let views = self.clone();
        Box::new(move |msg| {
            let views = views.clone();
            Box::pin(async move {
                match InvalidationEvent::from_json(&msg.payload) {
                    Ok(event) => views.evict(&event).await,
                    Err(e) => {
                        tracing::warn!(error = %e, "Ignoring malformed invalidation event")
                    }
                }
            })
        })
    }

    fn generation(&self, prefix: &str) -> u64 {
        let generations = self.generations.lock().unwrap_or_else(PoisonError::into_inner);
        generations.get(prefix).copied().unwrap_or(0)
    }

    fn bump(&self, prefix: &str) {
        let mut generations = self.generations.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = generations.entry(prefix.to_string()).or_insert(0);
        *generation = generation.wrapping_add(1);
    }

    // Undecodable entries count as misses.
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(key, "View cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Dropping undecodable view cache entry");
                None
            }
        }
    }

    // Failures only cost a future miss.
    async fn put<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to encode view");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &raw, Some(self.ttl)).await {
            tracing::warn!(key, error = %e, "Failed to cache view");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::domain::{PostId, UserId};
    use forum_infra::{InMemoryCache, InMemoryPubSub};

    fn views() -> ViewCache {
        ViewCache::new(Arc::new(InMemoryCache::new()), Duration::from_secs(60))
    }

    async fn load(views: &ViewCache, view: View, variant: &str, value: &str) -> String {
        let value = value.to_string();
        views
            .get_or_load(view, variant, move || async move { Ok::<_, ()>(value) })
            .await
            .unwrap()
    }

    fn author(id: i32) -> View {
        View::AuthorPosts {
            author_id: UserId::new(id),
        }
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let views = views();

        assert_eq!(load(&views, View::Listing, "page:1", "first").await, "first");
        assert_eq!(load(&views, View::Listing, "page:1", "second").await, "first");
    }

    #[tokio::test]
    async fn evict_drops_only_the_named_views() {
        let views = views();
        load(&views, View::Listing, "page:1", "page one").await;
        load(&views, View::Listing, "page:2", "page two").await;
        load(&views, author(1), "posts", "alvin").await;
        load(&views, author(12), "posts", "bea").await;

        views
            .evict(&InvalidationEvent::listing_and_author(UserId::new(1)))
            .await;

        assert_eq!(load(&views, View::Listing, "page:1", "new").await, "new");
        assert_eq!(load(&views, View::Listing, "page:2", "new").await, "new");
        assert_eq!(load(&views, author(1), "posts", "new").await, "new");
        assert_eq!(load(&views, author(12), "posts", "new").await, "bea");
    }

    #[tokio::test]
    async fn load_racing_an_eviction_is_not_cached() {
        let views = views();
        let event = InvalidationEvent::listing_and_author(UserId::new(1));

        let (racer, event) = (&views, &event);

        let stale = views
            .get_or_load(View::Listing, "page:1", move || async move {
                // A mutation commits and evicts while this read is in flight.
                racer.evict(event).await;
                Ok::<_, ()>("stale".to_string())
            })
            .await
            .unwrap();
        assert_eq!(stale, "stale");

        assert_eq!(load(&views, View::Listing, "page:1", "fresh").await, "fresh");
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let views = views();

        let failed = views
            .get_or_load(View::Listing, "page:1", || async { Err::<String, _>("boom") })
            .await;
        assert_eq!(failed, Err("boom"));

        assert_eq!(load(&views, View::Listing, "page:1", "ok").await, "ok");
    }

    #[tokio::test]
    async fn published_events_reach_the_cache() {
        let views = views();
        let pubsub = InMemoryPubSub::default();
        views.listen(&pubsub).await.unwrap();

        let post = View::Post {
            post_id: PostId::new(4),
        };
        load(&views, post, "detail", "cached").await;

        let event = InvalidationEvent::removed(UserId::new(1), PostId::new(4));
        pubsub
            .publish(INVALIDATION_CHANNEL, &event.to_json().unwrap())
            .await
            .unwrap();

        let key = ViewCache::key(&post, "detail");
        let evicted = async {
            while views.get::<String>(&key).await.is_some() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(1), evicted)
            .await
            .expect("post view should be evicted");
    }
}
