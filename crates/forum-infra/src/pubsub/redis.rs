//! Redis PubSub implementation.
//!
//! Lets every server instance receive the invalidation signals of the others.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use forum_core::ports::{MessageHandler, PubSub, PubSubError, PubSubMessage};

use crate::cache::RedisConfig;

/// Redis-backed PubSub implementation.
pub struct RedisPubSub {
    conn: ConnectionManager,
    client: Client,
    subscriptions: Arc<RwLock<HashMap<String, JoinHandle<()>>>>,
}

impl RedisPubSub {
    pub async fn new(config: &RedisConfig) -> Result<Self, PubSubError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| PubSubError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client.clone());
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| PubSubError::Connection("Connection timed out".to_string()))?
            .map_err(|e| PubSubError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis PubSub");

        Ok(Self {
            conn,
            client,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
        })
    }
}

#[async_trait]
impl PubSub for RedisPubSub {
    async fn publish(&self, channel: &str, message: &str) -> Result<(), PubSubError> {
        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(channel, message)
            .await
            .map_err(|e| PubSubError::PublishError(e.to_string()))?;
        Ok(())
    }

    async fn subscribe(&self, channel: &str, handler: MessageHandler) -> Result<(), PubSubError> {
        // Subscribe before returning so that no message published afterwards is missed.
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| PubSubError::SubscribeError(e.to_string()))?;
        pubsub
            .subscribe(channel)
            .await
            .map_err(|e| PubSubError::SubscribeError(e.to_string()))?;

        let channel_name = channel.to_string();
        tracing::debug!(channel = %channel_name, "Subscribed to Redis channel");

        let handle = tokio::spawn(async move {
            let mut stream = pubsub.on_message();
            while let Some(msg) = stream.next().await {
                let payload: String = match msg.get_payload() {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to get message payload");
                        continue;
                    }
                };

                let channel = msg.get_channel_name().to_string();
                handler(PubSubMessage { channel, payload }).await;
            }

            tracing::info!(channel = %channel_name, "PubSub connection closed");
        });

        if let Some(previous) = self
            .subscriptions
            .write()
            .await
            .insert(channel.to_string(), handle)
        {
            previous.abort();
        }

        Ok(())
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), PubSubError> {
        if let Some(handle) = self.subscriptions.write().await.remove(channel) {
            handle.abort();
            tracing::debug!(channel = %channel, "Unsubscribed from Redis channel");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    async fn get_test_pubsub() -> Option<RedisPubSub> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            fallback_to_memory: false,
        };

        RedisPubSub::new(&config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_pubsub() {
        let Some(pubsub) = get_test_pubsub().await else {
            return;
        };

        let channel = "forum_test_channel";
        let (tx, mut rx) = mpsc::channel(1);

        pubsub
            .subscribe(
                channel,
                Box::new(move |msg| {
                    let tx = tx.clone();
                    Box::pin(async move {
                        let _ = tx.send(msg.payload).await;
                    })
                }),
            )
            .await
            .unwrap();

        pubsub.publish(channel, "stale").await.unwrap();

        let received = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(received.as_deref(), Some("stale"));

        pubsub.unsubscribe(channel).await.unwrap();
    }
}
