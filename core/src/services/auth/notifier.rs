//! Trait for outbound account email delivery

use async_trait::async_trait;

use crate::errors::DomainError;

/// Trait for sending account lifecycle emails
///
/// Implementations live in the infrastructure layer. The service hands
/// over a recipient address and a fully built link; everything else
/// (templating, transport, retries) is the implementation's business.
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    /// Send the email verification link to a newly registered address
    async fn send_verification_email(&self, address: &str, link: &str)
        -> Result<(), DomainError>;

    /// Send the password reset link to an existing account's address
    async fn send_reset_password_email(&self, address: &str, link: &str)
        -> Result<(), DomainError>;
}
