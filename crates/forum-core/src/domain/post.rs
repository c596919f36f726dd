use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, PostId, UserId};

/// Post entity - a single forum entry as storage holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Ownership is exact integer equality between the stored author and the claimed user.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

/// A post joined with its author projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<Author>,
}

/// Validated fields for a post that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: String,
    pub content: String,
}

/// Validated replacement fields for an update. Author and timestamps are never part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
}
