//! In-memory storage gateway.
//!
//! Used when no database is configured and by the test suites.
//! Mirrors the PostgreSQL gateway: serial ids, newest-first ordering, and the
//! author foreign key. Data is lost on process restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use forum_core::domain::{Author, NewPost, Post, PostChanges, PostId, PostWithAuthor, UserId};
use forum_core::error::RepoError;
use forum_core::ports::{BaseRepository, PostRepository};

#[derive(Default)]
struct Store {
    posts: BTreeMap<PostId, Post>,
    authors: HashMap<UserId, Author>,
    next_id: i32,
}

impl Store {
    fn joined(&self, post: &Post) -> PostWithAuthor {
        PostWithAuthor {
            post: post.clone(),
            author: self.authors.get(&post.author_id).cloned(),
        }
    }

    fn newest_first<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<&'a Post> {
        let mut posts: Vec<&Post> = posts.collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Post repository backed by a map behind an async RwLock.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<Store>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository that knows the given authors up front.
    pub fn with_authors(authors: impl IntoIterator<Item = Author>) -> Self {
        let store = Store {
            authors: authors.into_iter().map(|a| (a.id, a)).collect(),
            ..Store::default()
        };
        Self {
            store: RwLock::new(store),
        }
    }

    /// Register (or rename) an author so posts may reference it.
    pub async fn upsert_author(&self, author: Author) {
        self.store.write().await.authors.insert(author.id, author);
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<PostWithAuthor, RepoError> {
        let mut store = self.store.write().await;

        if !store.authors.contains_key(&new_post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                new_post.author_id
            )));
        }

        store.next_id += 1;
        let now = Utc::now();
        let post = Post {
            id: PostId::new(store.next_id),
            author_id: new_post.author_id,
            title: new_post.title,
            content: new_post.content,
            created_at: now,
            updated_at: now,
        };

        let row = store.joined(&post);
        store.posts.insert(post.id, post);
        Ok(row)
    }

    async fn find_detail(&self, id: PostId) -> Result<Option<PostWithAuthor>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.get(&id).map(|post| store.joined(post)))
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<PostWithAuthor>, RepoError> {
        let store = self.store.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(Store::newest_first(store.posts.values())
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|post| store.joined(post))
            .collect())
    }

    async fn find_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let owned = store.posts.values().filter(|p| p.author_id == author_id);

        Ok(Store::newest_first(owned).into_iter().cloned().collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.posts.len() as u64)
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let post = store.posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        post.title = changes.title;
        post.content = changes.content;
        post.updated_at = Utc::now().max(post.updated_at);

        Ok(post.clone())
    }
}
