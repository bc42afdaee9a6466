//! Verified caller identity and token verification errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A caller identity obtained from a successfully verified token.
///
/// Never persisted on its own; the `user_id` only serves as half of a
/// [`Partition`](crate::message::Partition) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub user_id: String,
}

impl VerifiedIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Reasons a token can fail verification.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("signing keys unavailable: {0}")]
    KeysUnavailable(String),
}
