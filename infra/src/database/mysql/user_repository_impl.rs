//! MySQL implementation of the UserRepository trait.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE users (
//!     id CHAR(36) PRIMARY KEY,
//!     username VARCHAR(254) NOT NULL UNIQUE,
//!     password_hash VARCHAR(255) NOT NULL,
//!     role VARCHAR(16) NOT NULL,
//!     manager_id CHAR(36) NULL,
//!     is_verified BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMP(3) NOT NULL,
//!     updated_at TIMESTAMP(3) NOT NULL,
//!     INDEX idx_users_username (username)
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cs_core::domain::entities::user::User;
use cs_core::errors::{AuthError, DomainError};
use cs_core::repositories::UserRepository;

use super::parse_role;
use super::role_to_str;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let manager_id: Option<String> =
            row.try_get("manager_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get manager_id: {}", e),
            })?;
        let role: String = row.try_get("role").map_err(|e| DomainError::Internal {
            message: format!("Failed to get role: {}", e),
        })?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            username: row.try_get("username").map_err(|e| DomainError::Internal {
                message: format!("Failed to get username: {}", e),
            })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get password_hash: {}", e),
                })?,
            role: parse_role(&role)?,
            manager_id: manager_id
                .map(|m| {
                    Uuid::parse_str(&m).map_err(|e| DomainError::Internal {
                        message: format!("Invalid manager UUID: {}", e),
                    })
                })
                .transpose()?,
            is_verified: row
                .try_get("is_verified")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get is_verified: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }

    /// Map a write error, folding unique key violations into the domain
    fn map_write_error(e: sqlx::Error, action: &str) -> DomainError {
        match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::Auth(AuthError::UserAlreadyExists)
            }
            e => DomainError::Internal {
                message: format!("Failed to {}: {}", action, e),
            },
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, username, password_hash, role, manager_id, is_verified, created_at, updated_at
            FROM users
            WHERE username = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user by username: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, username, password_hash, role, manager_id, is_verified, created_at, updated_at
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user by id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        // Insert on first save, update afterwards, keyed by id.
        let check_query = "SELECT COUNT(*) AS count FROM users WHERE id = ?";
        let count_row = sqlx::query(check_query)
            .bind(user.id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to check user existence: {}", e),
            })?;
        let count: i64 = count_row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get existence count: {}", e),
        })?;

        if count > 0 {
            let query = r#"
                UPDATE users
                SET username = ?, password_hash = ?, role = ?, manager_id = ?,
                    is_verified = ?, updated_at = ?
                WHERE id = ?
            "#;

            sqlx::query(query)
                .bind(&user.username)
                .bind(&user.password_hash)
                .bind(role_to_str(user.role))
                .bind(user.manager_id.map(|m| m.to_string()))
                .bind(user.is_verified)
                .bind(user.updated_at)
                .bind(user.id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| Self::map_write_error(e, "update user"))?;
        } else {
            let query = r#"
                INSERT INTO users (
                    id, username, password_hash, role, manager_id, is_verified,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#;

            sqlx::query(query)
                .bind(user.id.to_string())
                .bind(&user.username)
                .bind(&user.password_hash)
                .bind(role_to_str(user.role))
                .bind(user.manager_id.map(|m| m.to_string()))
                .bind(user.is_verified)
                .bind(user.created_at)
                .bind(user.updated_at)
                .execute(&self.pool)
                .await
                .map_err(|e| Self::map_write_error(e, "insert user"))?;
        }

        Ok(user)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let query = "SELECT COUNT(*) AS count FROM users WHERE username = ?";

        let row = sqlx::query(query)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to check username existence: {}", e),
            })?;

        let count: i64 = row.try_get("count").map_err(|e| DomainError::Internal {
            message: format!("Failed to get existence count: {}", e),
        })?;

        Ok(count > 0)
    }
}
