//! Domain entities representing core business objects.

pub mod credential_token;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use credential_token::{CredentialToken, CredentialTokenKind, CREDENTIAL_TOKEN_LENGTH};
pub use token::{SessionClaims, TOKEN_TYPE_BEARER};
pub use user::{User, UserRole};
