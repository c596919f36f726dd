//! Post lifecycle service: create, list, get, update, delete.
//!
//! Each operation validates input before touching storage, runs the ownership
//! guard before any mutation, maps stored rows to [`DisplayPost`], and emits an
//! [`InvalidationEvent`] once a mutation has succeeded.

use std::sync::Arc;

use crate::domain::{
    Actor, DisplayPost, INVALIDATION_CHANNEL, InvalidationEvent, NewPost, PostChanges, PostId,
    PostPage, UserId,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, PubSub};

use super::ownership::{authorize, storage_failure};
use super::pagination::paginate;

/// Default number of posts per listing page.
pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// Input of [`PostService::create`]. The author is the acting user.
#[derive(Debug, Clone, Default)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
}

/// Input of [`PostService::update`].
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub post_id: String,
    pub title: String,
    pub content: String,
}

/// Post lifecycle service.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    events: Arc<dyn PubSub>,
    page_size: u64,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, events: Arc<dyn PubSub>, page_size: u64) -> Self {
        Self {
            posts,
            events,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Create a post authored by `actor`.
    pub async fn create(&self, actor: &Actor, input: CreatePost) -> Result<DisplayPost, DomainError> {
        require(&[
            ("title", input.title.as_str()),
            ("content", input.content.as_str()),
        ])?;

        let author_id = actor.user_id();
        let created = self
            .posts
            .create(NewPost {
                author_id,
                title: input.title,
                content: input.content,
            })
            .await
            .map_err(storage_failure("create"))?;

        tracing::info!(post_id = %created.post.id, author_id = %author_id, "Post created");
        self.emit(InvalidationEvent::listing_and_author(author_id)).await;

        Ok(created.into())
    }

    /// One page of the newest-first listing, with authors.
    pub async fn list(&self, page: u64) -> Result<PostPage, DomainError> {
        // Count and slice are separate reads; they may disagree under concurrent writes.
        let total = self.posts.count().await.map_err(storage_failure("count"))?;
        let window = paginate(page, self.page_size, total);

        let rows = self
            .posts
            .find_page(window.offset, window.limit)
            .await
            .map_err(storage_failure("list"))?;

        Ok(PostPage {
            posts: rows.into_iter().map(DisplayPost::from).collect(),
            current_page: window.page,
            total_pages: window.total_pages,
        })
    }

    /// All posts of one author, newest-first, without the author projection.
    pub async fn list_by_author(&self, author_id: &str) -> Result<Vec<DisplayPost>, DomainError> {
        let author_id = UserId::parse(author_id)
            .ok_or_else(|| DomainError::Validation("Invalid user ID".to_string()))?;

        let posts = self
            .posts
            .find_by_author(author_id)
            .await
            .map_err(storage_failure("list_by_author"))?;

        Ok(posts.into_iter().map(DisplayPost::from).collect())
    }

    /// A single post with its author.
    pub async fn get(&self, post_id: &str) -> Result<DisplayPost, DomainError> {
        let id = parse_post_id(post_id)?;

        self.posts
            .find_detail(id)
            .await
            .map_err(storage_failure("get"))?
            .map(DisplayPost::from)
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Replace title and content of a post owned by `actor`.
    pub async fn update(&self, actor: &Actor, input: UpdatePost) -> Result<DisplayPost, DomainError> {
        require(&[
            ("postId", input.post_id.as_str()),
            ("title", input.title.as_str()),
            ("content", input.content.as_str()),
        ])?;
        let id = parse_post_id(&input.post_id)?;

        let owned = authorize(self.posts.as_ref(), id, actor).await?;

        let updated = self
            .posts
            .update(
                id,
                PostChanges {
                    title: input.title,
                    content: input.content,
                },
            )
            .await
            .map_err(|err| not_found_or_storage(err, id, "update"))?;

        tracing::info!(post_id = %id, "Post updated");
        self.emit(InvalidationEvent::edited(owned.author_id, id)).await;

        Ok(updated.into())
    }

    /// Permanently remove a post owned by `actor`.
    pub async fn delete(&self, actor: &Actor, post_id: &str) -> Result<(), DomainError> {
        require(&[("postId", post_id)])?;
        let id = parse_post_id(post_id)?;

        let owned = authorize(self.posts.as_ref(), id, actor).await?;

        self.posts
            .delete(id)
            .await
            .map_err(|err| not_found_or_storage(err, id, "delete"))?;

        tracing::info!(post_id = %id, "Post deleted");
        self.emit(InvalidationEvent::removed(owned.author_id, id)).await;

        Ok(())
    }

    // The mutation has already succeeded; a lost signal only delays a refresh.
    async fn emit(&self, event: InvalidationEvent) {
        let payload = match event.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode invalidation event");
                return;
            }
        };

        if let Err(e) = self.events.publish(INVALIDATION_CHANNEL, &payload).await {
            tracing::warn!(error = %e, "Failed to publish invalidation event");
        }
    }
}

fn require(fields: &[(&str, &str)]) -> Result<(), DomainError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::missing_fields(&missing))
    }
}

// An id that is not a positive integer can never name a stored post.
fn parse_post_id(raw: &str) -> Result<PostId, DomainError> {
    PostId::parse(raw).ok_or_else(|| DomainError::post_not_found(raw.trim()))
}

fn not_found_or_storage(err: RepoError, id: PostId, operation: &'static str) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::post_not_found(id),
        other => storage_failure(operation)(other),
    }
}
