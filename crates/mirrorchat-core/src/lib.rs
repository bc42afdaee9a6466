//! Business logic and repository trait definitions for Mirrorchat.
//!
//! This crate defines the "ports" (repository, token verifier and LLM
//! provider traits) that the infrastructure layer implements, plus the two
//! orchestrators built on top of them. It depends only on `mirrorchat-types`
//! -- never on `mirrorchat-infra` or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod llm;
pub mod profile;

#[cfg(test)]
pub(crate) mod test_support;
