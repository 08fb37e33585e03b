//! Request-level helpers shared across route handlers.

pub mod error;

pub use error::*;
