//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Base URL the email verification link points at
    pub verification_link_base: String,
    /// Base URL the password reset link points at
    pub reset_link_base: String,
    /// Whether to allow registration of new users
    pub allow_registration: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            verification_link_base: "http://localhost:3000/verify-email".to_string(),
            reset_link_base: "http://localhost:3000/reset-password".to_string(),
            allow_registration: true,
        }
    }
}
