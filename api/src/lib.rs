//! HTTP surface for the CounterSign backend.
//!
//! Exposes the account and session endpoints over actix-web and carries the
//! session authentication gate. Business rules live in `cs_core`; this crate
//! translates HTTP in and out of them.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
