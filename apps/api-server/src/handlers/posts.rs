//! Post lifecycle endpoints.
//!
//! The acting user comes from the request body (`authorId` / `claimedUserId`)
//! and is not authenticated here; see [`Actor`].
//!
//! Mutations evict the views they touch before responding, so the caller's
//! next read is fresh. Other instances catch up through the invalidation
//! channel.

use actix_web::{HttpResponse, web};

use forum_core::domain::{Actor, InvalidationEvent, PostId, UserId, View};
use forum_core::services::{CreatePost, UpdatePost, page_number};
use forum_shared::ApiResponse;
use forum_shared::dto::{CreatePostRequest, DeletePostRequest, ListPostsQuery, UpdatePostRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let actor = Actor::claimed(body.author_id)?;

    let post = state
        .posts
        .create(
            &actor,
            CreatePost {
                title: body.title,
                content: body.content,
            },
        )
        .await?;

    state
        .views
        .evict(&InvalidationEvent::listing_and_author(actor.user_id()))
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// GET /api/posts?page=N
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let page = page_number(query.page.as_deref());

    let listing = state
        .views
        .get_or_load(View::Listing, &format!("page:{page}"), || {
            state.posts.list(page)
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(listing)))
}

/// GET /api/posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();

    // Malformed ids are never cached; the service reports them.
    let post = match PostId::parse(&raw_id) {
        Some(post_id) => {
            state
                .views
                .get_or_load(View::Post { post_id }, "detail", || {
                    state.posts.get(&raw_id)
                })
                .await?
        }
        None => state.posts.get(&raw_id).await?,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// PUT /api/posts/{post_id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let actor = Actor::claimed(body.claimed_user_id)?;
    let raw_id = path.into_inner();

    let post = state
        .posts
        .update(
            &actor,
            UpdatePost {
                post_id: raw_id.clone(),
                title: body.title,
                content: body.content,
            },
        )
        .await?;

    // Success means the id parsed and the actor owns the post.
    if let Some(post_id) = PostId::parse(&raw_id) {
        state
            .views
            .evict(&InvalidationEvent::edited(actor.user_id(), post_id))
            .await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<DeletePostRequest>,
) -> AppResult<HttpResponse> {
    let actor = Actor::claimed(body.claimed_user_id)?;
    let raw_id = path.into_inner();

    state.posts.delete(&actor, &raw_id).await?;

    if let Some(post_id) = PostId::parse(&raw_id) {
        state
            .views
            .evict(&InvalidationEvent::removed(actor.user_id(), post_id))
            .await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::done()))
}

/// GET /api/users/{user_id}/posts
pub async fn list_author_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();

    let posts = match UserId::parse(&raw_id) {
        Some(author_id) => {
            state
                .views
                .get_or_load(View::AuthorPosts { author_id }, "posts", || {
                    state.posts.list_by_author(&raw_id)
                })
                .await?
        }
        None => state.posts.list_by_author(&raw_id).await?,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}
