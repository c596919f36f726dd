//! Domain services composed from the ports.

mod ownership;
pub mod pagination;
mod posts;

pub use ownership::authorize;
pub use pagination::{PageWindow, page_number, paginate};
pub use posts::{CreatePost, DEFAULT_PAGE_SIZE, PostService, UpdatePost};
