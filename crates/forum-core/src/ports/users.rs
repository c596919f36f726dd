//! Remote user-account service port.

use async_trait::async_trait;

use crate::domain::{NewAccount, UserId};

/// Opaque reply of the user service, forwarded to callers as-is.
#[derive(Debug, Clone)]
pub struct UserServiceReply {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Client for the user-account service reached over HTTP.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a new account.
    async fn register(&self, account: &NewAccount) -> Result<UserServiceReply, UserServiceError>;

    /// Fetch an account, forwarding the caller's `Authorization` header.
    async fn fetch(
        &self,
        user_id: UserId,
        authorization: Option<&str>,
    ) -> Result<UserServiceReply, UserServiceError>;
}

/// User service errors.
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("User service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("User service unavailable: {0}")]
    Unavailable(String),
}
