//! MySQL implementation of the CredentialTokenRepository trait.
//!
//! Each token kind lives in its own table; the three tables share one
//! schema so a single row mapper covers them all:
//!
//! ```sql
//! CREATE TABLE email_verification_tokens (
//!     id CHAR(36) PRIMARY KEY,
//!     token VARCHAR(64) NOT NULL UNIQUE,
//!     user_id CHAR(36) NOT NULL,
//!     created_at TIMESTAMP(3) NOT NULL,
//!     expires_at TIMESTAMP(3) NOT NULL,
//!     invite_role VARCHAR(16) NULL,
//!     invite_manager_id CHAR(36) NULL,
//!     INDEX idx_expires_at (expires_at)
//! );
//! -- password_reset_tokens and invite_tokens are identical.
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cs_core::domain::entities::credential_token::{CredentialToken, CredentialTokenKind};
use cs_core::errors::{DomainError, TokenError};
use cs_core::repositories::CredentialTokenRepository;

use super::parse_role;
use super::role_to_str;

/// MySQL implementation of CredentialTokenRepository
pub struct MySqlCredentialTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlCredentialTokenRepository {
    /// Create a new MySQL credential token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Table holding rows of a given kind
    fn table_for(kind: CredentialTokenKind) -> &'static str {
        match kind {
            CredentialTokenKind::EmailVerification => "email_verification_tokens",
            CredentialTokenKind::PasswordReset => "password_reset_tokens",
            CredentialTokenKind::Invite => "invite_tokens",
        }
    }

    /// Convert a database row to a CredentialToken entity
    ///
    /// The kind comes from the caller since the table already implies it.
    fn row_to_token(
        kind: CredentialTokenKind,
        row: &sqlx::mysql::MySqlRow,
    ) -> Result<CredentialToken, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;
        let invite_role: Option<String> =
            row.try_get("invite_role").map_err(|e| DomainError::Internal {
                message: format!("Failed to get invite_role: {}", e),
            })?;
        let invite_manager_id: Option<String> =
            row.try_get("invite_manager_id")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get invite_manager_id: {}", e),
                })?;

        Ok(CredentialToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            token: row.try_get("token").map_err(|e| DomainError::Internal {
                message: format!("Failed to get token: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            kind,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            invite_role: invite_role.as_deref().map(parse_role).transpose()?,
            invite_manager_id: invite_manager_id
                .map(|m| {
                    Uuid::parse_str(&m).map_err(|e| DomainError::Internal {
                        message: format!("Invalid manager UUID: {}", e),
                    })
                })
                .transpose()?,
        })
    }
}

#[async_trait]
impl CredentialTokenRepository for MySqlCredentialTokenRepository {
    async fn save(&self, token: CredentialToken) -> Result<CredentialToken, DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (
                id, token, user_id, created_at, expires_at,
                invite_role, invite_manager_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            Self::table_for(token.kind)
        );

        sqlx::query(&query)
            .bind(token.id.to_string())
            .bind(&token.token)
            .bind(token.user_id.to_string())
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.invite_role.map(role_to_str))
            .bind(token.invite_manager_id.map(|m| m.to_string()))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DomainError::Token(TokenError::GenerationFailed)
                }
                e => DomainError::Internal {
                    message: format!("Failed to save credential token: {}", e),
                },
            })?;

        Ok(token)
    }

    async fn find_by_token(
        &self,
        kind: CredentialTokenKind,
        token: &str,
    ) -> Result<Option<CredentialToken>, DomainError> {
        let query = format!(
            r#"
            SELECT id, token, user_id, created_at, expires_at,
                   invite_role, invite_manager_id
            FROM {}
            WHERE token = ?
            LIMIT 1
            "#,
            Self::table_for(kind)
        );

        let result = sqlx::query(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find credential token: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(kind, &row)?)),
            None => Ok(None),
        }
    }

    async fn consume(&self, kind: CredentialTokenKind, token: &str) -> Result<bool, DomainError> {
        // One conditional delete is the whole consumption protocol. When
        // two requests race on the same token, MySQL removes the row
        // exactly once and the affected row count names the winner.
        let query = format!("DELETE FROM {} WHERE token = ?", Self::table_for(kind));

        let result = sqlx::query(&query)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to consume credential token: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(
        &self,
        kind: CredentialTokenKind,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let query = format!(
            "DELETE FROM {} WHERE expires_at <= ?",
            Self::table_for(kind)
        );

        let result = sqlx::query(&query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete expired tokens: {}", e),
            })?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_kind_has_its_own_table() {
        let tables = [
            MySqlCredentialTokenRepository::table_for(CredentialTokenKind::EmailVerification),
            MySqlCredentialTokenRepository::table_for(CredentialTokenKind::PasswordReset),
            MySqlCredentialTokenRepository::table_for(CredentialTokenKind::Invite),
        ];
        assert_eq!(tables[0], "email_verification_tokens");
        assert_eq!(tables[1], "password_reset_tokens");
        assert_eq!(tables[2], "invite_tokens");
        // No two kinds may share a table, or consume would cross flows.
        assert_ne!(tables[0], tables[1]);
        assert_ne!(tables[1], tables[2]);
    }
}
