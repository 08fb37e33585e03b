//! Domain-specific error types for authentication and token operations
//!
//! This module provides error type definitions for credential checks, token
//! handling, and startup configuration. User-facing messages are mapped in
//! the presentation layer so they can be localized.

use thiserror::Error;

/// Authentication-related errors
///
/// Unknown usernames and wrong passwords both surface as
/// `InvalidCredentials` so account existence never leaks through the error
/// surface.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not verified")]
    AccountNotVerified,

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Registration disabled")]
    RegistrationDisabled,

    #[error("Notification delivery failed")]
    NotificationFailed,
}

/// Token-related errors
///
/// `Expired` is only reported for tokens that are structurally valid and
/// correctly signed; anything illegible is `Malformed` and a wrong signature
/// is `BadSignature`.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token not found")]
    NotFound,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Startup configuration errors
///
/// All of these are fatal at startup; the server refuses to come up with a
/// missing or weak signing secret.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Signing secret is missing or empty")]
    MissingSecret,

    #[error("Signing secret is not valid base64: {reason}")]
    InvalidSecretEncoding { reason: String },

    #[error("Signing secret too weak: {bits} bits (minimum {required_bits} bits)")]
    WeakSecret { bits: usize, required_bits: usize },
}
