//! Ownership guard for post mutations.

use crate::domain::{Actor, Post, PostId};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// Confirm `actor` owns the post before it may be changed.
///
/// Returns the stored post on success so callers can reuse its owner id.
/// The check is advisory: it trusts that `actor` was authenticated upstream.
pub async fn authorize(
    posts: &dyn PostRepository,
    post_id: PostId,
    actor: &Actor,
) -> Result<Post, DomainError> {
    let post = posts
        .find_by_id(post_id)
        .await
        .map_err(storage_failure("authorize"))?
        .ok_or_else(|| DomainError::post_not_found(post_id))?;

    if !post.is_owned_by(actor.user_id()) {
        tracing::info!(
            post_id = %post_id,
            owner = %post.author_id,
            claimed = %actor.user_id(),
            "Ownership check rejected"
        );
        return Err(DomainError::Unauthorized);
    }

    Ok(post)
}

/// Log a storage failure in full and wrap it for the caller.
pub(crate) fn storage_failure(operation: &'static str) -> impl Fn(RepoError) -> DomainError {
    move |err| {
        tracing::error!(operation, error = %err, "Post storage failure");
        DomainError::Storage(err)
    }
}
