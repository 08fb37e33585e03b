//! In-memory mock of CredentialTokenRepository for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entities::credential_token::{CredentialToken, CredentialTokenKind};
use crate::errors::{DomainError, TokenError};

use super::r#trait::CredentialTokenRepository;

/// In-memory credential token store keyed by (kind, token string).
#[derive(Clone, Default)]
pub struct MockCredentialTokenRepository {
    tokens: Arc<RwLock<HashMap<(CredentialTokenKind, String), CredentialToken>>>,
}

impl MockCredentialTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows across all kinds.
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialTokenRepository for MockCredentialTokenRepository {
    async fn save(&self, token: CredentialToken) -> Result<CredentialToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        let key = (token.kind, token.token.clone());
        if tokens.contains_key(&key) {
            return Err(DomainError::Token(TokenError::GenerationFailed));
        }
        tokens.insert(key, token.clone());
        Ok(token)
    }

    async fn find_by_token(
        &self,
        kind: CredentialTokenKind,
        token: &str,
    ) -> Result<Option<CredentialToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(&(kind, token.to_string())).cloned())
    }

    async fn consume(&self, kind: CredentialTokenKind, token: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(&(kind, token.to_string())).is_some())
    }

    async fn delete_expired(
        &self,
        kind: CredentialTokenKind,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|(k, _), row| *k != kind || !row.is_expired_at(now));
        Ok((before - tokens.len()) as u64)
    }
}
