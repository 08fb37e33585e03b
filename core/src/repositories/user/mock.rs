//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};

use super::r#trait::UserRepository;

/// Mock user repository for testing
pub struct MockUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed a user into the repository
    pub async fn insert(&self, user: User) {
        self.users.write().await.push(user);
    }

    /// Snapshot of all stored users
    pub async fn all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        // Unique username constraint, as the database would enforce
        if users
            .iter()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(DomainError::Auth(AuthError::UserAlreadyExists));
        }

        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        } else {
            users.push(user.clone());
        }
        Ok(user)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.username == username))
    }
}
