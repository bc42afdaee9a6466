//! Fakes for router tests: a verifier that accepts one token, a provider
//! that answers from a script and a message store that is always down.

use std::collections::VecDeque;
use std::sync::Mutex;

use mirrorchat_core::auth::verifier::TokenVerifier;
use mirrorchat_core::chat::repository::MessageRepository;
use mirrorchat_core::llm::provider::LlmProvider;
use mirrorchat_types::error::RepositoryError;
use mirrorchat_types::identity::{AuthError, VerifiedIdentity};
use mirrorchat_types::message::{ChatMessage, MessageRole, Partition};
use mirrorchat_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

pub const GOOD_TOKEN: &str = "good-token";
pub const USER_ID: &str = "uid-1";

/// Accepts only [`GOOD_TOKEN`], mapping it to [`USER_ID`].
pub struct StaticVerifier;

impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        if token == GOOD_TOKEN {
            Ok(VerifiedIdentity::new(USER_ID))
        } else {
            Err(AuthError::Invalid("signature mismatch".to_string()))
        }
    }
}

/// Replays scripted replies in order; an exhausted script is a provider error.
pub struct CannedProvider {
    script: Mutex<VecDeque<Result<String, String>>>,
}

impl CannedProvider {
    pub fn new(script: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
        }
    }
}

impl LlmProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned-model"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(CompletionResponse {
                content,
                model: "canned-model".to_string(),
                finish_reason: Some("STOP".to_string()),
                usage: Usage::default(),
            }),
            Some(Err(message)) => Err(LlmError::Provider { message }),
            None => Err(LlmError::Provider {
                message: "script exhausted".to_string(),
            }),
        }
    }
}

/// A message store whose every call fails with a connection error.
pub struct UnavailableMessages;

impl MessageRepository for UnavailableMessages {
    async fn append_message(
        &self,
        _partition: &Partition,
        _role: MessageRole,
        _content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn recent_messages(
        &self,
        _partition: &Partition,
        _limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn delete_messages(&self, _partition: &Partition) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Connection)
    }
}
