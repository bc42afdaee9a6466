//! Infrastructure layer for Mirrorchat.
//!
//! Contains implementations of the ports defined in `mirrorchat-core`:
//! SQLite message and profile stores, the Gemini LLM provider, the Firebase
//! ID token verifier, and the server configuration loader.

pub mod auth;
pub mod config;
pub mod llm;
pub mod sqlite;
