use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostId, PostWithAuthor, UserId};
use crate::error::RepoError;

/// Generic repository trait for lookups and removal by primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Fails with [`RepoError::NotFound`] when absent.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Storage gateway for posts.
///
/// Every operation is atomic per row. Listings are ordered newest-first
/// (`created_at` descending, ties broken by id descending).
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// Persist a new post; storage assigns the id and both timestamps.
    async fn create(&self, post: NewPost) -> Result<PostWithAuthor, RepoError>;

    /// A single post joined with its author.
    async fn find_detail(&self, id: PostId) -> Result<Option<PostWithAuthor>, RepoError>;

    /// A newest-first window of posts joined with their authors.
    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<PostWithAuthor>, RepoError>;

    /// All posts of one author, newest-first.
    async fn find_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError>;

    /// Total number of posts.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Replace title and content and refresh `updated_at`.
    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, RepoError>;
}
