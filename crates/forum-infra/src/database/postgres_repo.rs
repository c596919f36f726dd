//! PostgreSQL storage gateway for posts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use forum_core::domain::{NewPost, Post, PostChanges, PostId, PostWithAuthor, UserId};
use forum_core::error::RepoError;
use forum_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

fn joined((post, author): (post::Model, Option<user::Model>)) -> PostWithAuthor {
    PostWithAuthor {
        post: post.into(),
        author: author.map(Into::into),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<PostWithAuthor, RepoError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let model = post::ActiveModel {
            author_id: Set(new_post.author_id.get()),
            title: Set(new_post.title),
            content: Set(new_post.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        let author = UserEntity::find_by_id(model.author_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(joined((model, author)))
    }

    async fn find_detail(&self, id: PostId) -> Result<Option<PostWithAuthor>, RepoError> {
        let row = PostEntity::find_by_id(id.get())
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(joined))
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<PostWithAuthor>, RepoError> {
        tracing::debug!(offset, limit, "Fetching post page");

        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(joined).collect())
    }

    async fn find_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id.get()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(map_db_err)
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let existing = PostEntity::find_by_id(id.get())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        // Never move updated_at backwards, even across clock adjustments.
        let previous: DateTime<Utc> = existing.updated_at.into();
        let updated_at = Utc::now().max(previous);

        let mut active: post::ActiveModel = existing.into();
        active.title = Set(changes.title);
        active.content = Set(changes.content);
        active.updated_at = Set(updated_at.into());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }
}
