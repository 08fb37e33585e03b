//! Tests for the credential token service

#[cfg(test)]
mod service_tests;
