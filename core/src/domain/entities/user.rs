//! User entity representing a registered account in the CounterSign system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a user in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator
    Admin,
    /// A manager overseeing a team of employees
    Manager,
    /// A regular employee
    Employee,
}

/// User entity representing a registered account
///
/// The username is unique and doubles as the account's notification address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique username (also the notification address)
    pub username: String,

    /// Bcrypt hash of the account password
    pub password_hash: String,

    /// Role assigned to the user
    pub role: UserRole,

    /// Manager this user reports to, if any
    pub manager_id: Option<Uuid>,

    /// Whether the account's address has been verified
    pub is_verified: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(username: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
            manager_id: None,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the account as verified
    pub fn verify(&mut self) {
        self.is_verified = true;
        self.updated_at = Utc::now();
    }

    /// Replaces the stored password hash
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Assigns a new role
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Assigns or clears the reporting manager
    pub fn assign_manager(&mut self, manager_id: Option<Uuid>) {
        self.manager_id = manager_id;
        self.updated_at = Utc::now();
    }

    /// Checks if the user has a reporting manager
    pub fn has_manager(&self) -> bool {
        self.manager_id.is_some()
    }

    /// Checks if the user is an administrator
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Checks if the user is a manager
    pub fn is_manager(&self) -> bool {
        matches!(self.role, UserRole::Manager)
    }
}
