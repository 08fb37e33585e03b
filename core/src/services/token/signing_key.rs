//! HMAC-SHA256 signing key management for session tokens

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::errors::ConfigError;

/// Minimum secret strength accepted for HMAC-SHA256 signing.
pub const MIN_SECRET_BITS: usize = 256;

/// Key pair derived from the configured token secret
///
/// The secret arrives as a base64 string from deployment configuration and
/// is decoded exactly once at startup. Every failure mode is a
/// [`ConfigError`] so the process can refuse to boot rather than run with
/// a key it cannot trust.
#[derive(Clone)]
pub struct SigningKey {
    /// Key for signing session tokens
    encoding_key: EncodingKey,
    /// Key for verifying session tokens
    decoding_key: DecodingKey,
    /// Decoded secret length in bits, kept for diagnostics
    secret_bits: usize,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret_bits", &self.secret_bits)
            .finish()
    }
}

impl SigningKey {
    /// Derives the signing key from a base64-encoded secret
    ///
    /// # Arguments
    ///
    /// * `secret` - Base64 (standard alphabet) encoding of the raw key bytes
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKey)` - Secret decoded and strong enough
    /// * `Err(ConfigError::MissingSecret)` - Secret absent or blank
    /// * `Err(ConfigError::InvalidSecretEncoding)` - Not valid base64
    /// * `Err(ConfigError::WeakSecret)` - Decoded key shorter than 256 bits
    ///
    /// # Example
    ///
    /// ```
    /// use cs_core::services::token::SigningKey;
    ///
    /// let secret = "c3VwZXItc2VjcmV0LXNpZ25pbmcta2V5LWZvci1zZXNzaW9ucy0hIQ==";
    /// let key = SigningKey::from_base64_secret(secret).expect("usable secret");
    /// ```
    pub fn from_base64_secret(secret: &str) -> Result<Self, ConfigError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let bytes = STANDARD
            .decode(secret)
            .map_err(|e| ConfigError::InvalidSecretEncoding {
                reason: e.to_string(),
            })?;

        let secret_bits = bytes.len() * 8;
        if secret_bits < MIN_SECRET_BITS {
            return Err(ConfigError::WeakSecret {
                bits: secret_bits,
                required_bits: MIN_SECRET_BITS,
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&bytes),
            decoding_key: DecodingKey::from_secret(&bytes),
            secret_bits,
        })
    }

    /// Returns the encoding key for signing
    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the decoding key for verification
    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Strength of the decoded secret in bits
    pub fn secret_bits(&self) -> usize {
        self.secret_bits
    }
}
