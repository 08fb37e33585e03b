//! Session token claims for signed stateless authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token type reported to clients
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Claims structure for the session token payload
///
/// Timestamps are Unix epoch milliseconds. The codec checks expiry against a
/// caller-supplied instant, so session lifetimes keep millisecond precision
/// end to end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (the account's username)
    pub sub: String,

    /// Issued-at timestamp, epoch milliseconds
    pub iat: i64,

    /// Expiration timestamp, epoch milliseconds
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims for a session token issued at `now`
    ///
    /// # Arguments
    ///
    /// * `subject` - The account's username
    /// * `now` - Issue instant
    /// * `ttl_ms` - Session lifetime in milliseconds
    pub fn new(subject: impl Into<String>, now: DateTime<Utc>, ttl_ms: i64) -> Self {
        let expiry = now + Duration::milliseconds(ttl_ms);
        Self {
            sub: subject.into(),
            iat: now.timestamp_millis(),
            exp: expiry.timestamp_millis(),
        }
    }

    /// Checks whether the claims are expired at the given instant
    ///
    /// A token is invalid from the exact expiry instant onward.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp
    }

    /// Expiry instant of these claims
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.exp)
    }
}
