use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use cs_core::domain::entities::user::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Account address; doubles as the notification address
    #[validate(email)]
    pub username: String,

    /// Raw password, 8 to 64 characters
    #[validate(length(min = 8, max = 64))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    /// Opaque token from the verification link
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Opaque token from the reset link
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = 8, max = 64))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InviteRequest {
    /// Address the invitation is for
    #[validate(email)]
    pub username: String,

    /// Role granted when the invite is accepted
    pub role: UserRole,

    /// Manager the new account will report to
    pub manager_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AcceptInviteRequest {
    /// Opaque token from the invitation
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = 8, max = 64))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = 8, max = 64))]
    pub new_password: String,
}

/// Session token response returned by login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Invite token handed back to the inviter for delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteResponse {
    pub invite_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Simple message response for flows with no payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Profile of the authenticated account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub manager_id: Option<Uuid>,
}
