//! Email Notifier Module
//!
//! Outbound delivery for account lifecycle emails. Two implementations
//! of the core `EmailNotifier` contract:
//!
//! - **Log notifier**: writes the link to the log, for development
//! - **Webhook notifier**: hands the send to an HTTP mail gateway
//!
//! `EmailBackend` picks between them from the environment at startup.

pub mod backend;
pub mod log_notifier;
pub mod webhook_notifier;

// Re-export commonly used types
pub use backend::EmailBackend;
pub use log_notifier::LogEmailNotifier;
pub use webhook_notifier::{WebhookEmailConfig, WebhookEmailNotifier};
