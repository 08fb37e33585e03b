//! Environment-driven choice of email delivery backend

use async_trait::async_trait;
use tracing::info;

use cs_core::errors::DomainError;
use cs_core::services::auth::EmailNotifier;

use crate::email::{LogEmailNotifier, WebhookEmailNotifier};
use crate::InfrastructureError;

/// The configured email delivery backend
///
/// Wiring code picks one concrete notifier at startup; this enum keeps the
/// application state monomorphic over a single notifier type.
pub enum EmailBackend {
    /// Deliveries are written to the log
    Log(LogEmailNotifier),
    /// Deliveries go through the HTTP mail gateway
    Webhook(WebhookEmailNotifier),
}

impl EmailBackend {
    /// Choose the backend from the environment
    ///
    /// With `EMAIL_WEBHOOK_URL` set the webhook gateway is used; otherwise
    /// deliveries are logged, which is the development default.
    pub fn from_env() -> Result<Self, InfrastructureError> {
        if std::env::var("EMAIL_WEBHOOK_URL").is_ok() {
            Ok(Self::Webhook(WebhookEmailNotifier::from_env()?))
        } else {
            info!("EMAIL_WEBHOOK_URL not set; email deliveries will be logged only");
            Ok(Self::Log(LogEmailNotifier::new()))
        }
    }
}

#[async_trait]
impl EmailNotifier for EmailBackend {
    async fn send_verification_email(
        &self,
        address: &str,
        link: &str,
    ) -> Result<(), DomainError> {
        match self {
            Self::Log(notifier) => notifier.send_verification_email(address, link).await,
            Self::Webhook(notifier) => notifier.send_verification_email(address, link).await,
        }
    }

    async fn send_reset_password_email(
        &self,
        address: &str,
        link: &str,
    ) -> Result<(), DomainError> {
        match self {
            Self::Log(notifier) => notifier.send_reset_password_email(address, link).await,
            Self::Webhook(notifier) => notifier.send_reset_password_email(address, link).await,
        }
    }
}
