//! `reqwest` implementation of [`UserDirectory`].
//!
//! The service is opaque: successful bodies are passed through untouched and
//! rejections keep the upstream status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use serde_json::Value;

use forum_core::domain::{NewAccount, UserId};
use forum_core::ports::{UserDirectory, UserServiceError, UserServiceReply};

/// Where the user service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("USER_SERVICE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("USER_SERVICE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }
}

pub struct HttpUserDirectory {
    client: Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(config: &UserServiceConfig) -> Result<Self, UserServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UserServiceError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/user{path}", self.base_url)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn register(&self, account: &NewAccount) -> Result<UserServiceReply, UserServiceError> {
        tracing::debug!(username = %account.username, "Registering user");

        let response = self
            .client
            .post(self.url(""))
            .json(account)
            .send()
            .await
            .map_err(unavailable)?;

        into_reply(response, "Failed to create user").await
    }

    async fn fetch(
        &self,
        user_id: UserId,
        authorization: Option<&str>,
    ) -> Result<UserServiceReply, UserServiceError> {
        let mut request = self.client.get(self.url(&format!("/{user_id}")));
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }

        let response = request.send().await.map_err(unavailable)?;
        into_reply(response, "Failed to fetch user").await
    }
}

fn unavailable(err: reqwest::Error) -> UserServiceError {
    tracing::error!(error = %err, "User service request failed");
    UserServiceError::Unavailable(err.to_string())
}

async fn into_reply(response: Response, fallback: &str) -> Result<UserServiceReply, UserServiceError> {
    let status = response.status();
    // Upstream error bodies are not always JSON.
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(UserServiceReply {
            status: status.as_u16(),
            body,
        });
    }

    tracing::warn!(status = status.as_u16(), body = %body, "User service rejected request");
    Err(UserServiceError::Rejected {
        status: status.as_u16(),
        message: rejection_message(&body, fallback),
    })
}

fn rejection_message(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejection_prefers_upstream_message() {
        let body = json!({ "message": "Username already taken" });
        assert_eq!(
            rejection_message(&body, "Failed to create user"),
            "Username already taken"
        );
    }

    #[test]
    fn rejection_falls_back_when_body_has_no_message() {
        assert_eq!(
            rejection_message(&Value::Null, "Failed to fetch user"),
            "Failed to fetch user"
        );
        assert_eq!(
            rejection_message(&json!({ "message": "" }), "Failed to fetch user"),
            "Failed to fetch user"
        );
    }

    #[test]
    fn urls_are_built_from_a_trimmed_base() {
        let directory = HttpUserDirectory::new(&UserServiceConfig {
            base_url: "http://users.local/".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(directory.url(""), "http://users.local/v1/user");
        assert_eq!(directory.url("/4"), "http://users.local/v1/user/4");
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let directory = HttpUserDirectory::new(&UserServiceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let result = directory.fetch(UserId::new(1), None).await;
        assert!(matches!(result, Err(UserServiceError::Unavailable(_))));
    }
}
