//! User repository trait defining the interface for account persistence.
//!
//! This module defines the repository pattern interface for User entities.
//! It is the single identity store contract consumed by the credential check
//! service and the authentication gate. The trait is async-first and uses
//! Result types for proper error handling.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Implementations handle the actual database operations while maintaining
/// the abstraction boundary between domain and infrastructure layers.
/// Usernames are stored normalized (trimmed, lowercase); callers are
/// expected to normalize before lookups.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique username
    ///
    /// # Arguments
    /// * `username` - The normalized username to look up
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given username
    /// * `Err(DomainError)` - Database or other error occurred
    ///
    /// # Example
    /// ```no_run
    /// # use cs_core::repositories::UserRepository;
    /// # async fn example(repo: &impl UserRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// match repo.find_by_username("alice@example.com").await? {
    ///     Some(user) => println!("User found: {}", user.id),
    ///     None => println!("User not found"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    ///
    /// # Arguments
    /// * `id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Persist a user, inserting on first save and updating afterwards
    ///
    /// The row is keyed by `id`. This is the single mutation point the
    /// credential flows use for the verified flag, password hash, role and
    /// manager assignment.
    ///
    /// # Arguments
    /// * `user` - The User entity to persist
    ///
    /// # Returns
    /// * `Ok(User)` - The persisted user
    /// * `Err(DomainError)` - Save failed (e.g. duplicate username)
    ///
    /// # Example
    /// ```no_run
    /// # use cs_core::repositories::UserRepository;
    /// # use cs_core::domain::entities::user::{User, UserRole};
    /// # async fn example(repo: &impl UserRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let user = User::new(
    ///     "alice@example.com".to_string(),
    ///     "$2b$12$hash".to_string(),
    ///     UserRole::Employee,
    /// );
    /// let mut user = repo.save(user).await?;
    ///
    /// user.verify();
    /// repo.save(user).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, user: User) -> Result<User, DomainError>;

    /// Check if a user exists with the given username
    ///
    /// # Arguments
    /// * `username` - The normalized username
    ///
    /// # Returns
    /// * `Ok(true)` - Username is taken
    /// * `Ok(false)` - Username is free
    /// * `Err(DomainError)` - Database error occurred
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;
}
