use thiserror::Error;

use crate::identity::AuthError;
use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in mirrorchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Errors surfaced by the conversation and deletion orchestrators.
///
/// Only primary-path failures are represented here. Follow-up question
/// generation and profile re-estimation never produce a `ChatError`.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("server is not configured")]
    NotConfigured,

    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("generation failed: {0}")]
    Generation(#[source] LlmError),

    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_from_auth() {
        let err: ChatError = AuthError::Expired.into();
        assert!(matches!(err, ChatError::Authentication(AuthError::Expired)));
        assert_eq!(err.to_string(), "authentication failed: token expired");
    }

    #[test]
    fn test_chat_error_from_repository() {
        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(err, ChatError::Persistence(_)));
    }

    #[test]
    fn test_generation_error_keeps_source() {
        let err = ChatError::Generation(LlmError::AuthenticationFailed);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("authentication failed"));
    }
}
