//! Display shape of a post - what callers outside the storage boundary see.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, Post, PostWithAuthor};

/// A post normalized for the wire: string id, epoch-millisecond timestamps,
/// optional author projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl DisplayPost {
    /// Map a stored post into its display shape.
    pub fn new(post: Post, author: Option<Author>) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title,
            content: post.content,
            created_at: epoch_millis(post.created_at),
            updated_at: epoch_millis(post.updated_at),
            author,
        }
    }
}

impl From<Post> for DisplayPost {
    fn from(post: Post) -> Self {
        Self::new(post, None)
    }
}

impl From<PostWithAuthor> for DisplayPost {
    fn from(row: PostWithAuthor) -> Self {
        Self::new(row.post, row.author)
    }
}

/// One page of the newest-first listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<DisplayPost>,
    pub current_page: u64,
    pub total_pages: u64,
}

// Pre-epoch instants clamp to zero.
fn epoch_millis(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{PostId, UserId};

    fn stored(created_at: DateTime<Utc>) -> Post {
        Post {
            id: PostId::new(17),
            author_id: UserId::new(1),
            title: "Post 1".to_string(),
            content: "Content 1".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn renders_string_id_and_millisecond_timestamps() {
        let at = Utc.with_ymd_and_hms(2025, 7, 25, 10, 0, 0).unwrap();
        let display = DisplayPost::from(stored(at));

        assert_eq!(display.id, "17");
        assert_eq!(display.title, "Post 1");
        assert_eq!(display.content, "Content 1");
        assert_eq!(display.created_at, 1_753_437_600_000);
        assert_eq!(display.updated_at, display.created_at);
        assert!(display.author.is_none());
    }

    #[test]
    fn passes_author_projection_through() {
        let author = Author {
            id: UserId::new(1),
            username: "alvin".to_string(),
        };
        let display = DisplayPost::from(PostWithAuthor {
            post: stored(Utc::now()),
            author: Some(author.clone()),
        });

        assert_eq!(display.author, Some(author));
    }

    #[test]
    fn pre_epoch_timestamps_clamp_to_zero() {
        let at = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(DisplayPost::from(stored(at)).created_at, 0);
    }

    #[test]
    fn serializes_camel_case_and_omits_missing_author() {
        let at = Utc.with_ymd_and_hms(2025, 7, 25, 10, 0, 0).unwrap();
        let json = serde_json::to_value(DisplayPost::from(stored(at))).unwrap();

        assert_eq!(json["id"], "17");
        assert_eq!(json["createdAt"], 1_753_437_600_000u64);
        assert!(json.get("author").is_none());
    }
}
