//! Credential token repository trait for single-use token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::credential_token::{CredentialToken, CredentialTokenKind};
use crate::errors::DomainError;

/// Repository trait for CredentialToken persistence operations
///
/// This trait defines the contract for the ephemeral token side-tables.
/// Tokens are written once, read by their opaque string, and removed by a
/// single conditional delete on consumption.
///
/// # Consumption semantics
/// `consume` must be one atomic delete keyed by the token string. When two
/// callers race on the same token, the delete's row count decides the
/// winner; there is no separate read-then-delete step to get out of sync.
#[async_trait]
pub trait CredentialTokenRepository: Send + Sync {
    /// Save a new credential token
    ///
    /// # Arguments
    /// * `token` - The CredentialToken entity to persist
    ///
    /// # Returns
    /// * `Ok(CredentialToken)` - The saved token
    /// * `Err(DomainError)` - Save failed (e.g. duplicate token string)
    async fn save(&self, token: CredentialToken) -> Result<CredentialToken, DomainError>;

    /// Find a token by its kind and opaque string
    ///
    /// Expired rows are still returned; expiry policy belongs to the caller.
    ///
    /// # Arguments
    /// * `kind` - The flow the token belongs to
    /// * `token` - The opaque token string
    ///
    /// # Returns
    /// * `Ok(Some(CredentialToken))` - Token found
    /// * `Ok(None)` - No token with the given string
    /// * `Err(DomainError)` - Database error occurred
    ///
    /// # Example
    /// ```no_run
    /// # use cs_core::repositories::CredentialTokenRepository;
    /// # use cs_core::domain::entities::credential_token::CredentialTokenKind;
    /// # async fn example(repo: &impl CredentialTokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let found = repo
    ///     .find_by_token(CredentialTokenKind::PasswordReset, "opaque-token-string")
    ///     .await?;
    /// if let Some(token) = found {
    ///     println!("Token for user {}", token.user_id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_by_token(
        &self,
        kind: CredentialTokenKind,
        token: &str,
    ) -> Result<Option<CredentialToken>, DomainError>;

    /// Consume a token with one conditional atomic delete
    ///
    /// # Arguments
    /// * `kind` - The flow the token belongs to
    /// * `token` - The opaque token string
    ///
    /// # Returns
    /// * `Ok(true)` - A row was removed; this caller won the redemption
    /// * `Ok(false)` - No row removed; absent or already consumed
    /// * `Err(DomainError)` - Database error occurred
    async fn consume(&self, kind: CredentialTokenKind, token: &str) -> Result<bool, DomainError>;

    /// Delete all expired tokens of a kind
    ///
    /// Entry point for an external janitor; nothing in this subsystem
    /// schedules it.
    ///
    /// # Arguments
    /// * `kind` - The flow whose rows to sweep
    /// * `now` - Instant rows are measured against
    ///
    /// # Returns
    /// * `Ok(count)` - Number of rows removed
    /// * `Err(DomainError)` - Database error occurred
    async fn delete_expired(
        &self,
        kind: CredentialTokenKind,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError>;
}
