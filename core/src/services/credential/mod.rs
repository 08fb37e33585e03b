//! Ephemeral credential token service
//!
//! Mechanism for the one-shot tokens behind email verification, password
//! reset and invites: opaque random strings stored server-side, redeemed
//! at most once via a conditional delete.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::CredentialTokenConfig;
pub use service::CredentialTokenService;
