//! Data transfer objects for the HTTP surface

pub mod auth;
pub mod error;

pub use auth::*;
pub use error::*;
