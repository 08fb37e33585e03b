//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TOKEN_TYPE_BEARER;

/// Authentication response returned after successful credential checks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Signed session token for API authentication
    pub access_token: String,

    /// Token type clients must use in the Authorization header
    pub token_type: String,

    /// Session token lifetime in seconds
    pub expires_in: i64,
}

impl AuthResponse {
    /// Creates a bearer-token authentication response
    ///
    /// # Arguments
    ///
    /// * `access_token` - The signed session token
    /// * `expires_in` - Session lifetime in seconds
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        }
    }
}
