//! Shared domain types for Mirrorchat.
//!
//! This crate contains the core domain types used across the workspace:
//! chat messages, partitions, personality profiles, LLM request shapes,
//! verified identities, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod error;
pub mod identity;
pub mod llm;
pub mod message;
pub mod profile;
