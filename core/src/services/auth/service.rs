//! Main authentication service implementation

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use cs_shared::utils::validation::{
    is_valid_password, is_valid_username, mask_username, normalize_username,
    PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
};

use crate::domain::entities::credential_token::CredentialTokenKind;
use crate::domain::entities::user::{User, UserRole};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{CredentialTokenRepository, UserRepository};
use crate::services::credential::CredentialTokenService;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::notifier::EmailNotifier;

/// Result of inviting a user
///
/// Carries the minted invite token back to the caller. The notifier has
/// no invite template, so handing the token to the invitee is the
/// caller's concern.
#[derive(Debug, Clone)]
pub struct InviteOutcome {
    /// Address the invite was created for
    pub username: String,
    /// Opaque invite token to deliver to the invitee
    pub token: String,
    /// When the token stops being redeemable
    pub expires_at: DateTime<Utc>,
}

/// Authentication service for credential checks and account flows
pub struct AuthService<U, C, N>
where
    U: UserRepository,
    C: CredentialTokenRepository,
    N: EmailNotifier,
{
    /// User repository for identity lookups and persistence
    user_repository: Arc<U>,
    /// Single-use token service behind verification, reset and invites
    credential_tokens: Arc<CredentialTokenService<C>>,
    /// Session token service
    token_service: Arc<TokenService>,
    /// Outbound email delivery
    notifier: Arc<N>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, C, N> AuthService<U, C, N>
where
    U: UserRepository,
    C: CredentialTokenRepository,
    N: EmailNotifier,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `credential_tokens` - Service minting single-use tokens
    /// * `token_service` - Service issuing session tokens
    /// * `notifier` - Outbound email delivery
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        credential_tokens: Arc<CredentialTokenService<C>>,
        token_service: Arc<TokenService>,
        notifier: Arc<N>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            credential_tokens,
            token_service,
            notifier,
            config,
        }
    }

    /// Check a username and password and issue a session token
    ///
    /// Unknown usernames and wrong passwords produce the same
    /// `InvalidCredentials` error so a caller cannot probe which accounts
    /// exist. An unverified account is only reported as such once the
    /// password has proved the caller owns it.
    ///
    /// # Arguments
    ///
    /// * `username` - Account address as entered by the caller
    /// * `password` - Raw password to check
    /// * `now` - Instant the session token is issued at
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Bearer token valid from `now`
    /// * `Err(AuthError::InvalidCredentials)` - Unknown user or wrong password
    /// * `Err(AuthError::AccountNotVerified)` - Password correct, email not verified
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<AuthResponse> {
        // Step 1: Look up the account
        let username = normalize_username(username);
        let user = self.user_repository.find_by_username(&username).await?;

        // Step 2: Check the password. An unknown user and a wrong
        // password must be indistinguishable to the caller.
        let user = match user {
            Some(user) => user,
            None => {
                debug!(username = %mask_username(&username), "login for unknown username");
                return Err(DomainError::Auth(AuthError::InvalidCredentials));
            }
        };
        if !self.verify_password(password, &user.password_hash)? {
            debug!(username = %mask_username(&username), "login with wrong password");
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }

        // Step 3: Only a caller who proved the password learns the
        // account is unverified
        if !user.is_verified {
            return Err(DomainError::Auth(AuthError::AccountNotVerified));
        }

        // Step 4: Issue the session token
        let access_token = self.token_service.issue(&user.username, now)?;
        info!(username = %mask_username(&user.username), "login succeeded");

        Ok(AuthResponse::bearer(
            access_token,
            self.token_service.session_ttl_ms() / 1000,
        ))
    }

    /// Register a new account and send its verification link
    ///
    /// The account is stored unverified with the `Employee` role; it
    /// cannot log in until the emailed verification token is redeemed.
    ///
    /// # Arguments
    ///
    /// * `username` - Address to register, also where the link is sent
    /// * `password` - Raw password to hash and store
    /// * `now` - Instant the verification token is minted at
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        // Step 1: Registration can be switched off per deployment
        if !self.config.allow_registration {
            return Err(DomainError::Auth(AuthError::RegistrationDisabled));
        }

        // Step 2: Validate inputs
        let username = Self::validate_username(username)?;
        Self::validate_new_password(password)?;

        // Step 3: Usernames are unique
        if self.user_repository.exists_by_username(&username).await? {
            return Err(DomainError::Auth(AuthError::UserAlreadyExists));
        }

        // Step 4: Persist the unverified account
        let password_hash = self.hash_password(password)?;
        let user = self
            .user_repository
            .save(User::new(username, password_hash, UserRole::Employee))
            .await?;

        // Step 5: Mint the verification token and send the link
        let token = self
            .credential_tokens
            .create(CredentialTokenKind::EmailVerification, user.id, now)
            .await?;
        let link = self.verification_link(&token.token);
        self.notifier
            .send_verification_email(&user.username, &link)
            .await
            .map_err(|e| {
                warn!(
                    username = %mask_username(&user.username),
                    error = %e,
                    "verification email failed"
                );
                DomainError::Auth(AuthError::NotificationFailed)
            })?;

        info!(username = %mask_username(&user.username), "user registered");
        Ok(())
    }

    /// Redeem an email verification token
    ///
    /// An expired token is rejected and its row left in place; a missing
    /// row after lookup means a concurrent redemption won.
    pub async fn verify_email(&self, token: &str, now: DateTime<Utc>) -> DomainResult<()> {
        // Step 1: Resolve the token
        let stored = self
            .credential_tokens
            .lookup(CredentialTokenKind::EmailVerification, token)
            .await?;
        if stored.is_expired_at(now) {
            return Err(DomainError::Token(TokenError::Expired));
        }

        // Step 2: Burn it before acting on it
        if !self
            .credential_tokens
            .consume(CredentialTokenKind::EmailVerification, token)
            .await?
        {
            return Err(DomainError::Token(TokenError::NotFound));
        }

        // Step 3: Mark the account verified
        let mut user = self
            .user_repository
            .find_by_id(stored.user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;
        user.verify();
        self.user_repository.save(user).await?;

        info!(user_id = %stored.user_id, "email verified");
        Ok(())
    }

    /// Start a password reset for a known account
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Reset token minted and link sent
    /// * `Err(AuthError::UserNotFound)` - No account under that address
    pub async fn forgot_password(&self, username: &str, now: DateTime<Utc>) -> DomainResult<()> {
        // Step 1: Resets only exist for known accounts
        let username = normalize_username(username);
        let user = self
            .user_repository
            .find_by_username(&username)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        // Step 2: Mint the reset token and send the link
        let token = self
            .credential_tokens
            .create(CredentialTokenKind::PasswordReset, user.id, now)
            .await?;
        let link = self.reset_link(&token.token);
        self.notifier
            .send_reset_password_email(&user.username, &link)
            .await
            .map_err(|e| {
                warn!(
                    username = %mask_username(&user.username),
                    error = %e,
                    "reset email failed"
                );
                DomainError::Auth(AuthError::NotificationFailed)
            })?;

        info!(username = %mask_username(&user.username), "password reset requested");
        Ok(())
    }

    /// Redeem a password reset token and store the new password
    ///
    /// An expired token leaves both the row and the old password
    /// untouched.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        // Step 1: Validate the replacement before touching anything
        Self::validate_new_password(new_password)?;

        // Step 2: Resolve the token
        let stored = self
            .credential_tokens
            .lookup(CredentialTokenKind::PasswordReset, token)
            .await?;
        if stored.is_expired_at(now) {
            return Err(DomainError::Token(TokenError::Expired));
        }

        // Step 3: Burn the token before the password changes hands
        if !self
            .credential_tokens
            .consume(CredentialTokenKind::PasswordReset, token)
            .await?
        {
            return Err(DomainError::Token(TokenError::NotFound));
        }

        // Step 4: Store the new password
        let mut user = self
            .user_repository
            .find_by_id(stored.user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;
        let password_hash = self.hash_password(new_password)?;
        user.set_password_hash(password_hash);
        self.user_repository.save(user).await?;

        info!(user_id = %stored.user_id, "password reset completed");
        Ok(())
    }

    /// Invite a new user and mint the invite token
    ///
    /// Persists a placeholder identity that cannot log in, then returns
    /// the token for the caller to deliver. The role and manager recorded
    /// on the token, not on the placeholder row, are what
    /// [`accept_invite`](Self::accept_invite) applies.
    pub async fn invite_user(
        &self,
        username: &str,
        role: UserRole,
        manager_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> DomainResult<InviteOutcome> {
        // Step 1: Validate the address and uniqueness
        let username = Self::validate_username(username)?;
        if self.user_repository.exists_by_username(&username).await? {
            return Err(DomainError::Auth(AuthError::UserAlreadyExists));
        }

        // Step 2: Persist a placeholder identity. The password hash is a
        // throwaway nobody is ever told, so the account stays unusable
        // until the invite is accepted.
        let placeholder_password = Uuid::new_v4().simple().to_string();
        let password_hash = self.hash_password(&placeholder_password)?;
        let user = self
            .user_repository
            .save(User::new(username, password_hash, UserRole::Employee))
            .await?;

        // Step 3: Mint the invite token carrying the invited role
        let token = self
            .credential_tokens
            .create_invite(user.id, role, manager_id, now)
            .await?;

        info!(username = %mask_username(&user.username), role = ?role, "user invited");
        Ok(InviteOutcome {
            username: user.username,
            token: token.token,
            expires_at: token.expires_at,
        })
    }

    /// Redeem an invite token, setting the password and invited role
    pub async fn accept_invite(
        &self,
        token: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        // Step 1: Validate the chosen password first
        Self::validate_new_password(password)?;

        // Step 2: Resolve the invite
        let stored = self
            .credential_tokens
            .lookup(CredentialTokenKind::Invite, token)
            .await?;
        if stored.is_expired_at(now) {
            return Err(DomainError::Token(TokenError::Expired));
        }

        // Step 3: Burn it
        if !self
            .credential_tokens
            .consume(CredentialTokenKind::Invite, token)
            .await?
        {
            return Err(DomainError::Token(TokenError::NotFound));
        }

        // Step 4: Promote the placeholder using the token's payload
        let mut user = self
            .user_repository
            .find_by_id(stored.user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;
        let password_hash = self.hash_password(password)?;
        user.set_password_hash(password_hash);
        if let Some(role) = stored.invite_role {
            user.set_role(role);
        }
        user.assign_manager(stored.invite_manager_id);
        user.verify();
        self.user_repository.save(user).await?;

        info!(user_id = %stored.user_id, "invite accepted");
        Ok(())
    }

    /// Change a password for an account with a proven current password
    ///
    /// A live session is not enough on its own; the caller must present
    /// the current password again.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        // Step 1: Validate the replacement
        Self::validate_new_password(new_password)?;

        // Step 2: Check the current password
        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;
        if !self.verify_password(current_password, &user.password_hash)? {
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }

        // Step 3: Store the new password
        let password_hash = self.hash_password(new_password)?;
        user.set_password_hash(password_hash);
        self.user_repository.save(user).await?;

        info!(user_id = %user_id, "password changed");
        Ok(())
    }

    fn verification_link(&self, token: &str) -> String {
        format!("{}?token={}", self.config.verification_link_base, token)
    }

    fn reset_link(&self, token: &str) -> String {
        format!("{}?token={}", self.config.reset_link_base, token)
    }

    fn hash_password(&self, password: &str) -> DomainResult<String> {
        hash(password, DEFAULT_COST).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> DomainResult<bool> {
        verify(password, password_hash).map_err(|e| DomainError::Internal {
            message: format!("Failed to verify password: {}", e),
        })
    }

    fn validate_username(username: &str) -> DomainResult<String> {
        let username = normalize_username(username);
        if !is_valid_username(&username) {
            return Err(DomainError::Validation {
                message: "Username must be a valid email address".to_string(),
            });
        }
        Ok(username)
    }

    fn validate_new_password(password: &str) -> DomainResult<()> {
        if !is_valid_password(password) {
            return Err(DomainError::Validation {
                message: format!(
                    "Password must be between {} and {} characters",
                    PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH
                ),
            });
        }
        Ok(())
    }
}
