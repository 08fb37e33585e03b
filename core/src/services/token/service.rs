//! Main session token service implementation

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};

use crate::domain::entities::token::SessionClaims;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;
use super::signing_key::SigningKey;

/// Service for issuing and verifying session tokens
///
/// The service is a pure codec over [`SessionClaims`]: it holds no
/// storage and consults no clock of its own. Every operation takes `now`
/// from the caller, which keeps expiry decisions deterministic and
/// testable.
///
/// Expiry is enforced here, against the caller's clock, rather than by
/// the JWT library's own clock-based check. A token whose signature does
/// not verify is never reported as expired; signature and shape problems
/// always win.
pub struct TokenService {
    signing_key: SigningKey,
    config: TokenServiceConfig,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `signing_key` - HMAC key loaded at startup
    /// * `config` - Token service configuration
    pub fn new(signing_key: SigningKey, config: TokenServiceConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock below, not
        // by the library against the wall clock.
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            signing_key,
            config,
            validation,
        }
    }

    /// Issues a signed session token for a subject
    ///
    /// # Arguments
    ///
    /// * `subject` - Identity the token speaks for, typically the username
    /// * `now` - Issue instant; expiry is `now` plus the configured TTL
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed compact token
    /// * `Err(DomainError)` - Token generation failed
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, DomainError> {
        let claims = SessionClaims::new(subject, now, self.config.session_ttl_ms);
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.signing_key.encoding(),
        )
        .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    /// Verifies a session token and returns its claims
    ///
    /// # Arguments
    ///
    /// * `token` - The compact token string to verify
    /// * `now` - Instant the expiry is measured against
    ///
    /// # Returns
    ///
    /// * `Ok(SessionClaims)` - Signature checks out and `now` is before expiry
    /// * `Err(TokenError::Malformed)` - Not a structurally valid token
    /// * `Err(TokenError::BadSignature)` - Well-formed but wrongly signed
    /// * `Err(TokenError::Expired)` - Well-signed but `now >= exp`
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, DomainError> {
        let token_data = decode::<SessionClaims>(
            token,
            self.signing_key.decoding(),
            &self.validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                DomainError::Token(TokenError::BadSignature)
            }
            _ => DomainError::Token(TokenError::Malformed),
        })?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            return Err(DomainError::Token(TokenError::Expired));
        }
        Ok(claims)
    }

    /// Extracts the subject from a valid token
    ///
    /// Shorthand for [`verify`](Self::verify) followed by reading the
    /// subject claim; fails exactly when `verify` fails.
    pub fn subject_of(&self, token: &str, now: DateTime<Utc>) -> Result<String, DomainError> {
        self.verify(token, now).map(|claims| claims.sub)
    }

    /// Checks whether a token is currently valid for a given subject
    ///
    /// Collapses every failure, including malformed input, to `false`.
    /// Intended for guard positions where the caller only needs a yes or
    /// no, such as re-checking a session against a freshly loaded user.
    pub fn is_valid_for(&self, token: &str, subject: &str, now: DateTime<Utc>) -> bool {
        match self.verify(token, now) {
            Ok(claims) => claims.sub == subject,
            Err(_) => false,
        }
    }

    /// Session lifetime this service issues tokens with, in milliseconds
    pub fn session_ttl_ms(&self) -> i64 {
        self.config.session_ttl_ms
    }
}
