//! Shared utilities and common types for the CounterSign server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Utility functions (username validation, masking, etc.)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, DatabaseConfig, Environment, ServerConfig};
pub use utils::validation;
