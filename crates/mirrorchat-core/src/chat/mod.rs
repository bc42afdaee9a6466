//! Conversation orchestration for Mirrorchat.
//!
//! - `repository`: the `MessageRepository` port
//! - `prompt`: deterministic prompt construction from a profile
//! - `service`: `ConversationService`, one user message in, one stored reply out
//! - `deletion`: `DeletionService`, wipes a partition

pub mod deletion;
pub mod prompt;
pub mod repository;
pub mod service;
