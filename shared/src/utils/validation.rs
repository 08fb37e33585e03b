//! Username and password validation utilities
//!
//! Usernames double as notification addresses, so the username check is an
//! email-shape check.

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic email shape: local part, single @, dotted domain
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

/// Minimum accepted password length
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum accepted password length (bcrypt truncates beyond 72 bytes; this
/// bound keeps requests honest well before that)
pub const PASSWORD_MAX_LENGTH: usize = 64;

/// Normalize a username for storage and lookup
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Check if a username is a valid notification address
pub fn is_valid_username(username: &str) -> bool {
    let normalized = normalize_username(username);
    normalized.len() <= 254 && USERNAME_REGEX.is_match(&normalized)
}

/// Check if a password length is within the accepted bounds
pub fn is_valid_password(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&len)
}

/// Mask a username for logging (e.g. `al***@example.com`)
pub fn mask_username(username: &str) -> String {
    match username.split_once('@') {
        Some((local, domain)) if local.chars().count() > 2 => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}
