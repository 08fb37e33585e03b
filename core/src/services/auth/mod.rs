//! Authentication service module
//!
//! Account flows built on the token services: credential checks at login,
//! registration with email verification, password reset and invites.

mod config;
mod notifier;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use notifier::EmailNotifier;
pub use service::{AuthService, InviteOutcome};
