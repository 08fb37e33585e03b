//! Business services containing domain logic and use cases.

pub mod auth;
pub mod credential;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, EmailNotifier, InviteOutcome};
pub use credential::{CredentialTokenConfig, CredentialTokenService};
pub use token::{SigningKey, TokenService, TokenServiceConfig};
