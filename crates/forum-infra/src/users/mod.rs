//! Client for the remote user-account service.

mod http;

pub use http::{HttpUserDirectory, UserServiceConfig};
