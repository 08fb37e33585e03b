//! Authentication and token lifecycle configuration

use serde::{Deserialize, Serialize};

/// Authentication configuration
///
/// All lifetimes are expressed in milliseconds; token validity checks are
/// millisecond-precise throughout the core.
///
/// There is no built-in signing secret. `token_secret` stays empty unless
/// `AUTH_TOKEN_SECRET` is set, and an empty secret fails key derivation at
/// startup, so a deployment cannot silently sign sessions with a known key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Base64-encoded HMAC secret for session token signing
    pub token_secret: String,

    /// Session token lifetime in milliseconds
    pub session_ttl_ms: i64,

    /// Email verification token lifetime in milliseconds
    pub verification_token_ttl_ms: i64,

    /// Password reset token lifetime in milliseconds
    pub password_reset_token_ttl_ms: i64,

    /// Invitation token lifetime in milliseconds
    pub invite_token_ttl_ms: i64,

    /// Base URL embedded in verification emails
    pub verification_link_base: String,

    /// Base URL embedded in password reset emails
    pub reset_link_base: String,

    /// Whether self-service registration is open
    pub allow_registration: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            session_ttl_ms: 24 * 60 * 60 * 1000,           // 24 hours
            verification_token_ttl_ms: 24 * 60 * 60 * 1000, // 24 hours
            password_reset_token_ttl_ms: 60 * 60 * 1000,    // 1 hour
            invite_token_ttl_ms: 7 * 24 * 60 * 60 * 1000,   // 7 days
            verification_link_base: String::from("http://localhost:8080/verify-email"),
            reset_link_base: String::from("http://localhost:8080/reset-password"),
            allow_registration: true,
        }
    }
}

impl AuthConfig {
    /// Create a new configuration with the given base64-encoded secret
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            ..Default::default()
        }
    }

    /// Set session token lifetime in hours
    pub fn with_session_ttl_hours(mut self, hours: i64) -> Self {
        self.session_ttl_ms = hours * 60 * 60 * 1000;
        self
    }

    /// Set invitation token lifetime in days
    pub fn with_invite_ttl_days(mut self, days: i64) -> Self {
        self.invite_token_ttl_ms = days * 24 * 60 * 60 * 1000;
        self
    }

    /// Create from environment variables
    ///
    /// An unset `AUTH_TOKEN_SECRET` leaves the secret empty; key
    /// derivation then refuses to start the process.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_secret: std::env::var("AUTH_TOKEN_SECRET").unwrap_or_default(),
            session_ttl_ms: env_i64("SESSION_TTL_MS", defaults.session_ttl_ms),
            verification_token_ttl_ms: env_i64(
                "VERIFICATION_TOKEN_TTL_MS",
                defaults.verification_token_ttl_ms,
            ),
            password_reset_token_ttl_ms: env_i64(
                "PASSWORD_RESET_TOKEN_TTL_MS",
                defaults.password_reset_token_ttl_ms,
            ),
            invite_token_ttl_ms: env_i64("INVITE_TOKEN_TTL_MS", defaults.invite_token_ttl_ms),
            verification_link_base: std::env::var("VERIFICATION_LINK_BASE")
                .unwrap_or(defaults.verification_link_base),
            reset_link_base: std::env::var("RESET_LINK_BASE").unwrap_or(defaults.reset_link_base),
            allow_registration: env_bool("ALLOW_REGISTRATION", defaults.allow_registration),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
