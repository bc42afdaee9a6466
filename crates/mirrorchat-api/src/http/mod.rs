//! HTTP API layer for Mirrorchat.
//!
//! Axum router with two JSON endpoints, a health check, and optional static
//! file serving for the bundled web client.

pub mod error;
pub mod handlers;
pub mod router;

#[cfg(test)]
mod test_support;
