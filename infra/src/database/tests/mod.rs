//! Tests for the database layer

#[cfg(test)]
mod connection_tests;
#[cfg(test)]
mod repository_tests;
