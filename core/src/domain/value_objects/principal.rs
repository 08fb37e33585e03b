//! Request principal established by the authentication gate.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::{User, UserRole};

/// The identity attached to a request
///
/// Every request carries exactly one principal. The authentication gate
/// resolves bearer credentials into `Authenticated` or degrades silently to
/// `Anonymous`; it never rejects a request itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Principal {
    /// No identity was established for the request
    Anonymous,
    /// A verified account was resolved from the bearer token
    Authenticated {
        /// The resolved account
        user: User,
    },
}

impl Principal {
    /// Checks whether a real identity backs this principal
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated { .. })
    }

    /// The resolved account, if any
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Authenticated { user } => Some(user),
            Principal::Anonymous => None,
        }
    }

    /// The authenticated username, if any
    pub fn username(&self) -> Option<&str> {
        self.user().map(|u| u.username.as_str())
    }

    /// The authenticated role, if any
    pub fn role(&self) -> Option<UserRole> {
        self.user().map(|u| u.role)
    }
}

impl Default for Principal {
    fn default() -> Self {
        Principal::Anonymous
    }
}
