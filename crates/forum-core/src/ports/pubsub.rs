//! Broadcast channel between server instances.
//!
//! Post mutations are announced here as JSON `InvalidationEvent`s so every
//! instance can evict the views it holds. Delivery is fire-and-forget: a
//! subscriber that is down misses the message and relies on view TTLs.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

/// One delivered payload and the channel it arrived on.
#[derive(Debug, Clone)]
pub struct PubSubMessage {
    pub channel: String,
    pub payload: String,
}

/// Callback run for each message on a subscribed channel. Boxed so the
/// trait stays object safe behind `Arc<dyn PubSub>`.
pub type MessageHandler =
    Box<dyn Fn(PubSubMessage) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

#[async_trait]
pub trait PubSub: Send + Sync {
    async fn publish(&self, channel: &str, message: &str) -> Result<(), PubSubError>;

    /// Run `handler` for every message on `channel` until unsubscribed.
    async fn subscribe(&self, channel: &str, handler: MessageHandler) -> Result<(), PubSubError>;

    async fn unsubscribe(&self, channel: &str) -> Result<(), PubSubError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PubSubError {
    #[error("could not announce on channel: {0}")]
    PublishError(String),

    #[error("could not listen on channel: {0}")]
    SubscribeError(String),

    #[error("broker unreachable: {0}")]
    Connection(String),
}
