//! Invalidation signals emitted after successful post mutations.

use serde::{Deserialize, Serialize};

use super::{PostId, UserId};

/// Pub/sub channel carrying [`InvalidationEvent`]s as JSON.
pub const INVALIDATION_CHANNEL: &str = "posts.invalidation";

/// A presentation view whose cached rendering may now be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum View {
    /// The home listing, every page of it.
    Listing,
    /// One author's posts.
    AuthorPosts {
        #[serde(rename = "authorId")]
        author_id: UserId,
    },
    /// A single post.
    Post {
        #[serde(rename = "postId")]
        post_id: PostId,
    },
}

impl View {
    /// Route of the view in the presentation layer.
    pub fn path(&self) -> String {
        match self {
            View::Listing => "/".to_string(),
            View::AuthorPosts { author_id } => format!("/users/{author_id}/posts"),
            View::Post { post_id } => format!("/posts/{post_id}"),
        }
    }

    /// Prefix shared by every cache key that renders this view.
    ///
    /// Prefixes end with `:` so that author 1 never matches author 12.
    pub fn cache_prefix(&self) -> String {
        match self {
            View::Listing => "view:listing:".to_string(),
            View::AuthorPosts { author_id } => format!("view:author:{author_id}:"),
            View::Post { post_id } => format!("view:post:{post_id}:"),
        }
    }
}

/// Notification that the named views must be re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationEvent {
    pub views: Vec<View>,
}

impl InvalidationEvent {
    /// Views touched by creating a post of `author_id`.
    pub fn listing_and_author(author_id: UserId) -> Self {
        Self {
            views: vec![View::Listing, View::AuthorPosts { author_id }],
        }
    }

    /// Views touched by editing `post_id`.
    pub fn edited(author_id: UserId, post_id: PostId) -> Self {
        Self::touching_post(author_id, post_id)
    }

    /// Views touched by deleting `post_id`, including its own page.
    pub fn removed(author_id: UserId, post_id: PostId) -> Self {
        Self::touching_post(author_id, post_id)
    }

    fn touching_post(author_id: UserId, post_id: PostId) -> Self {
        Self {
            views: vec![
                View::Listing,
                View::AuthorPosts { author_id },
                View::Post { post_id },
            ],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
