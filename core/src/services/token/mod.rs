//! Session token service for signed, self-contained session tokens
//!
//! This module handles the session token lifecycle:
//! - Loading the HMAC-SHA256 signing key from the configured secret
//! - Issuing tokens that carry the subject and a millisecond expiry
//! - Verifying tokens against an explicit caller-supplied clock

mod config;
mod service;
mod signing_key;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
pub use signing_key::{SigningKey, MIN_SECRET_BITS};
