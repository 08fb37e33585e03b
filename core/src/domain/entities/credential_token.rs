//! Single-use credential tokens for account lifecycle flows.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;

/// Length of the opaque token string (62 alphanumeric symbols at 32
/// positions is roughly 190 bits of entropy)
pub const CREDENTIAL_TOKEN_LENGTH: usize = 32;

/// The account lifecycle flow a credential token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialTokenKind {
    /// Confirms ownership of the account's notification address
    EmailVerification,
    /// Authorizes a password reset
    PasswordReset,
    /// Invitation to activate a pre-provisioned account
    Invite,
}

impl CredentialTokenKind {
    /// Stable name used for logging and storage mapping
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialTokenKind::EmailVerification => "email_verification",
            CredentialTokenKind::PasswordReset => "password_reset",
            CredentialTokenKind::Invite => "invite",
        }
    }
}

/// Single-use credential token entity
///
/// Each token is an opaque random string tied to one user and one kind.
/// Consumption removes the row; expiry leaves the row in place until an
/// external janitor purges it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialToken {
    /// Unique identifier for the token row
    pub id: Uuid,

    /// The opaque token string handed to the account holder
    pub token: String,

    /// The user this token belongs to
    pub user_id: Uuid,

    /// The flow this token belongs to
    pub kind: CredentialTokenKind,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Role to apply on invite redemption
    pub invite_role: Option<UserRole>,

    /// Manager to assign on invite redemption
    pub invite_manager_id: Option<Uuid>,
}

impl CredentialToken {
    /// Creates a new credential token issued at `now`
    ///
    /// # Arguments
    ///
    /// * `kind` - The flow this token belongs to
    /// * `user_id` - The user the token is bound to
    /// * `now` - Issue instant
    /// * `ttl_ms` - Token lifetime in milliseconds
    pub fn new(kind: CredentialTokenKind, user_id: Uuid, now: DateTime<Utc>, ttl_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: Self::generate_token(),
            user_id,
            kind,
            created_at: now,
            expires_at: now + Duration::milliseconds(ttl_ms),
            invite_role: None,
            invite_manager_id: None,
        }
    }

    /// Creates an invitation token carrying the role and manager to apply
    /// when the invite is redeemed
    pub fn new_invite(
        user_id: Uuid,
        role: UserRole,
        manager_id: Option<Uuid>,
        now: DateTime<Utc>,
        ttl_ms: i64,
    ) -> Self {
        let mut token = Self::new(CredentialTokenKind::Invite, user_id, now, ttl_ms);
        token.invite_role = Some(role);
        token.invite_manager_id = manager_id;
        token
    }

    /// Generates a random opaque token string
    fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        (0..CREDENTIAL_TOKEN_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..62);
                match idx {
                    0..10 => (b'0' + idx) as char,
                    10..36 => (b'a' + idx - 10) as char,
                    36..62 => (b'A' + idx - 36) as char,
                    _ => unreachable!(),
                }
            })
            .collect()
    }

    /// Checks whether the token is expired at the given instant
    ///
    /// A token is unusable from the exact expiry instant onward.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
