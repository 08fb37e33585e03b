//! Main credential token service implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::credential_token::{CredentialToken, CredentialTokenKind};
use crate::domain::entities::user::UserRole;
use crate::errors::{DomainError, TokenError};
use crate::repositories::CredentialTokenRepository;

use super::config::CredentialTokenConfig;

/// Service for minting and redeeming single-use credential tokens
///
/// This service is pure mechanism. It mints opaque tokens, looks them up
/// and consumes them; deciding what a redeemed token means (verify an
/// account, reset a password, accept an invite) is the flow layer's job.
/// Expiry is likewise the caller's decision: `lookup` returns expired
/// rows untouched so the flow can weigh the token's age against its own
/// clock.
pub struct CredentialTokenService<R: CredentialTokenRepository> {
    repository: Arc<R>,
    config: CredentialTokenConfig,
}

impl<R: CredentialTokenRepository> CredentialTokenService<R> {
    /// Creates a new credential token service
    pub fn new(repository: Arc<R>, config: CredentialTokenConfig) -> Self {
        Self { repository, config }
    }

    /// Lifetime configured for a token kind, in milliseconds
    pub fn ttl_ms_for(&self, kind: CredentialTokenKind) -> i64 {
        match kind {
            CredentialTokenKind::EmailVerification => self.config.verification_ttl_ms,
            CredentialTokenKind::PasswordReset => self.config.password_reset_ttl_ms,
            CredentialTokenKind::Invite => self.config.invite_ttl_ms,
        }
    }

    /// Mints and stores a token for a verification or reset flow
    ///
    /// Invite tokens carry extra payload and are minted through
    /// [`create_invite`](Self::create_invite) instead.
    ///
    /// # Arguments
    ///
    /// * `kind` - The flow the token belongs to
    /// * `user_id` - User the token refers to
    /// * `now` - Mint instant; expiry is `now` plus the kind's TTL
    pub async fn create(
        &self,
        kind: CredentialTokenKind,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CredentialToken, DomainError> {
        if kind == CredentialTokenKind::Invite {
            return Err(DomainError::Internal {
                message: "invite tokens must be created with create_invite".to_string(),
            });
        }

        let token = CredentialToken::new(kind, user_id, now, self.ttl_ms_for(kind));
        let saved = self.repository.save(token).await?;
        debug!(kind = kind.as_str(), user_id = %user_id, "credential token created");
        Ok(saved)
    }

    /// Mints and stores an invite token carrying the invited role
    ///
    /// The role and optional manager recorded here are authoritative for
    /// the eventual accept step; the placeholder user row is not trusted
    /// for either.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Placeholder user the invite refers to
    /// * `role` - Role the invitee will hold once the invite is accepted
    /// * `manager_id` - Manager to assign on acceptance, if any
    /// * `now` - Mint instant
    pub async fn create_invite(
        &self,
        user_id: Uuid,
        role: UserRole,
        manager_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<CredentialToken, DomainError> {
        let token = CredentialToken::new_invite(
            user_id,
            role,
            manager_id,
            now,
            self.config.invite_ttl_ms,
        );
        let saved = self.repository.save(token).await?;
        debug!(user_id = %user_id, role = ?role, "invite token created");
        Ok(saved)
    }

    /// Looks up a token by kind and opaque string
    ///
    /// Expired rows are returned as-is; callers check expiry against
    /// their own clock.
    ///
    /// # Returns
    ///
    /// * `Ok(CredentialToken)` - Row found
    /// * `Err(TokenError::NotFound)` - No such token
    pub async fn lookup(
        &self,
        kind: CredentialTokenKind,
        token: &str,
    ) -> Result<CredentialToken, DomainError> {
        self.repository
            .find_by_token(kind, token)
            .await?
            .ok_or(DomainError::Token(TokenError::NotFound))
    }

    /// Consumes a token with a single conditional delete
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - This caller redeemed the token
    /// * `Ok(false)` - Token absent or already redeemed by someone else
    pub async fn consume(
        &self,
        kind: CredentialTokenKind,
        token: &str,
    ) -> Result<bool, DomainError> {
        self.repository.consume(kind, token).await
    }

    /// Removes expired rows of a kind
    ///
    /// Housekeeping entry point for an external scheduler or operator
    /// command; normal flows never call this.
    pub async fn purge_expired(
        &self,
        kind: CredentialTokenKind,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let purged = self.repository.delete_expired(kind, now).await?;
        if purged > 0 {
            info!(kind = kind.as_str(), purged, "purged expired credential tokens");
        }
        Ok(purged)
    }
}
