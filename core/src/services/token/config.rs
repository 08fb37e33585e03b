//! Configuration for the session token service

/// Configuration for the session token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Session token lifetime in milliseconds
    pub session_ttl_ms: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            // 24 hours
            session_ttl_ms: 24 * 60 * 60 * 1000,
        }
    }
}

impl TokenServiceConfig {
    /// Creates a config with an explicit session lifetime
    pub fn with_session_ttl_ms(session_ttl_ms: i64) -> Self {
        Self { session_ttl_ms }
    }
}
