//! Data Transfer Objects - request types for the API.
//!
//! Text fields default to empty so that a missing field surfaces as a
//! `missing-fields` failure instead of a deserialization error.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_id: Option<i64>,
}

/// Body of `PUT /api/posts/{postId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub claimed_user_id: Option<i64>,
}

/// Body of `DELETE /api/posts/{postId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostRequest {
    pub claimed_user_id: Option<i64>,
}

/// Query string of `GET /api/posts`. The page stays raw; the server coerces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
}

/// Body of `POST /api/users`, forwarded to the user-account service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
