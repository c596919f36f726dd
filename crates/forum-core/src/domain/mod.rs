//! Domain entities - the core business objects.

mod actor;
mod display;
mod ids;
mod invalidation;
mod post;
mod user;

pub use actor::Actor;
pub use display::{DisplayPost, PostPage};
pub use ids::{PostId, UserId};
pub use invalidation::{INVALIDATION_CHANNEL, InvalidationEvent, View};
pub use post::{NewPost, Post, PostChanges, PostWithAuthor};
pub use user::{Author, NewAccount};
