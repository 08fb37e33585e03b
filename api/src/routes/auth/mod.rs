//! Authentication route handlers
//!
//! This module contains all account lifecycle endpoints:
//! - Registration and email verification
//! - Login (credential check and session issuance)
//! - Password reset and password change
//! - Invites

pub mod accept_invite;
pub mod change_password;
pub mod forgot_password;
pub mod invite;
pub mod login;
pub mod register;
pub mod reset_password;
pub mod verify_email;

pub use login::AppState;
