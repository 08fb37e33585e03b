//! Webhook email notifier for production delivery
//!
//! Posts a small JSON payload to an HTTP mail gateway that owns the
//! actual templating and SMTP work. The gateway contract is one endpoint
//! accepting `{ "template": ..., "to": ..., "link": ... }`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use cs_core::errors::DomainError;
use cs_core::services::auth::EmailNotifier;
use cs_shared::utils::validation::mask_username;

use crate::InfrastructureError;

/// Webhook mail gateway configuration
#[derive(Debug, Clone)]
pub struct WebhookEmailConfig {
    /// Gateway endpoint accepting the JSON payload
    pub endpoint: String,
    /// Bearer token presented to the gateway, if any
    pub api_key: Option<String>,
    /// Timeout for gateway requests in seconds
    pub request_timeout_secs: u64,
}

impl WebhookEmailConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let endpoint = std::env::var("EMAIL_WEBHOOK_URL")
            .map_err(|_| InfrastructureError::Config("EMAIL_WEBHOOK_URL not set".to_string()))?;

        Ok(Self {
            endpoint,
            api_key: std::env::var("EMAIL_WEBHOOK_API_KEY").ok(),
            request_timeout_secs: std::env::var("EMAIL_WEBHOOK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

/// Payload posted to the mail gateway
#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    template: &'a str,
    to: &'a str,
    link: &'a str,
}

/// Email notifier that delivers through an HTTP mail gateway
pub struct WebhookEmailNotifier {
    client: reqwest::Client,
    config: WebhookEmailConfig,
}

impl WebhookEmailNotifier {
    /// Create a new webhook notifier
    pub fn new(config: WebhookEmailConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(endpoint = %config.endpoint, "webhook email notifier initialized");
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(WebhookEmailConfig::from_env()?)
    }

    async fn post(
        &self,
        template: &'static str,
        address: &str,
        link: &str,
    ) -> Result<(), DomainError> {
        let payload = EmailPayload {
            template,
            to: address,
            link,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&payload);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(template, error = %e, "mail gateway request failed");
            DomainError::Internal {
                message: format!("Mail gateway request failed: {}", e),
            }
        })?;

        if !response.status().is_success() {
            warn!(
                template,
                status = %response.status(),
                "mail gateway rejected the send"
            );
            return Err(DomainError::Internal {
                message: format!("Mail gateway returned {}", response.status()),
            });
        }

        debug!(template, to = %mask_username(address), "email handed to gateway");
        Ok(())
    }
}

#[async_trait]
impl EmailNotifier for WebhookEmailNotifier {
    async fn send_verification_email(
        &self,
        address: &str,
        link: &str,
    ) -> Result<(), DomainError> {
        self.post("verification", address, link).await
    }

    async fn send_reset_password_email(
        &self,
        address: &str,
        link: &str,
    ) -> Result<(), DomainError> {
        self.post("reset_password", address, link).await
    }
}
