//! # Forum Shared
//!
//! Wire types shared between the server and its clients: request bodies,
//! query strings, and the uniform response envelope.

pub mod dto;
pub mod response;

pub use response::ApiResponse;
