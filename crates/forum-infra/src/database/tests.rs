use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use forum_core::domain::{Post, PostChanges, PostId, UserId};
use forum_core::error::RepoError;
use forum_core::ports::{BaseRepository, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn post_model(id: i32, author_id: i32, title: &str) -> post::Model {
    let at = Utc.with_ymd_and_hms(2025, 7, 25, 10, 0, 0).unwrap();
    post::Model {
        id,
        author_id,
        title: title.to_owned(),
        content: "Content".to_owned(),
        created_at: at.into(),
        updated_at: at.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(7, 1, "Test Post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, PostId>::find_by_id(&repo, PostId::new(7))
        .await
        .unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, PostId::new(7));
    assert_eq!(post.author_id, UserId::new(1));
}

#[tokio::test]
async fn test_find_missing_post_returns_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, PostId>::find_by_id(&repo, PostId::new(99))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, PostId>::delete(&repo, PostId::new(3)).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_by_author_maps_rows_in_query_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(5, 2, "newer"), post_model(4, 2, "older")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo.find_by_author(UserId::new(2)).await.unwrap();
    let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["newer", "older"]);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo
        .update(
            PostId::new(1),
            PostChanges {
                title: "t".to_owned(),
                content: "c".to_owned(),
            },
        )
        .await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}
