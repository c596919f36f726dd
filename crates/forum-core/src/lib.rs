//! # Forum Core
//!
//! The domain layer of the forum backend.
//! Post lifecycle, ownership checks, and pagination live here with zero
//! infrastructure dependencies; storage, messaging, and the remote user
//! service are reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, Failure, FailureReason};
pub use services::PostService;
