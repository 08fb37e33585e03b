use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Standard error response body
///
/// Carries a stable machine-readable code and a localized human-readable
/// message. Login failures deliberately share one code and message for
/// unknown users and wrong passwords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code
    pub error: String,

    /// Localized human-readable message
    pub message: String,

    /// Field-level validation details, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
