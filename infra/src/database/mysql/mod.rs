//! MySQL repository implementations

use cs_core::domain::entities::user::UserRole;
use cs_core::errors::DomainError;

pub mod credential_token_repository_impl;
pub mod user_repository_impl;

pub use credential_token_repository_impl::MySqlCredentialTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

/// Role value as stored in the database
pub(crate) fn role_to_str(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "admin",
        UserRole::Manager => "manager",
        UserRole::Employee => "employee",
    }
}

/// Parse a stored role value back into the enum
pub(crate) fn parse_role(value: &str) -> Result<UserRole, DomainError> {
    match value {
        "admin" => Ok(UserRole::Admin),
        "manager" => Ok(UserRole::Manager),
        "employee" => Ok(UserRole::Employee),
        other => Err(DomainError::Internal {
            message: format!("Unknown role in database: {}", other),
        }),
    }
}
