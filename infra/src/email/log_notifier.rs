//! Log-only email notifier for development environments

use async_trait::async_trait;
use tracing::info;

use cs_core::errors::DomainError;
use cs_core::services::auth::EmailNotifier;
use cs_shared::utils::validation::mask_username;

/// Email notifier that writes sends to the log instead of delivering
///
/// Useful in development, where the operator copies the link straight
/// out of the log. The full link is logged on purpose; the recipient
/// address is masked like everywhere else.
#[derive(Debug, Clone, Default)]
pub struct LogEmailNotifier;

impl LogEmailNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailNotifier for LogEmailNotifier {
    async fn send_verification_email(
        &self,
        address: &str,
        link: &str,
    ) -> Result<(), DomainError> {
        info!(
            to = %mask_username(address),
            link,
            "verification email (log only)"
        );
        Ok(())
    }

    async fn send_reset_password_email(
        &self,
        address: &str,
        link: &str,
    ) -> Result<(), DomainError> {
        info!(
            to = %mask_username(address),
            link,
            "password reset email (log only)"
        );
        Ok(())
    }
}
