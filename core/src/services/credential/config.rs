//! Configuration for the credential token service

/// Lifetimes for each credential token kind, in milliseconds
#[derive(Debug, Clone)]
pub struct CredentialTokenConfig {
    /// Email verification token lifetime
    pub verification_ttl_ms: i64,
    /// Password reset token lifetime
    pub password_reset_ttl_ms: i64,
    /// Invite token lifetime
    pub invite_ttl_ms: i64,
}

impl Default for CredentialTokenConfig {
    fn default() -> Self {
        Self {
            // 24 hours
            verification_ttl_ms: 24 * 60 * 60 * 1000,
            // 1 hour
            password_reset_ttl_ms: 60 * 60 * 1000,
            // 7 days
            invite_ttl_ms: 7 * 24 * 60 * 60 * 1000,
        }
    }
}
