//! Conversation service turning one user message into a stored reply.
//!
//! `ConversationService` sequences the token verifier, the message and
//! profile stores, and the LLM provider. The order of boundary calls is fixed:
//!
//! 1. verify token
//! 2. append the user message (kept even if generation later fails)
//! 3. read recent history, read profile
//! 4. generate the reply (fatal on failure)
//! 5. on every fifth exchange, generate a follow-up question (best effort)
//! 6. append the reply
//! 7. re-estimate and merge-write the profile (best effort)
//!
//! Known limitation: nothing serializes exchanges of the same partition. Two
//! concurrent requests can read the same `conversationCount` and both write
//! the same incremented value.

use tracing::{info, warn};

use mirrorchat_types::error::ChatError;
use mirrorchat_types::llm::{CompletionRequest, LlmError, Message, MessageRole};
use mirrorchat_types::message::{ChatMessage, Partition};
use mirrorchat_types::profile::Profile;

use crate::auth::verifier::TokenVerifier;
use crate::chat::prompt::{build_system_instruction, follow_up_question_prompt, is_follow_up_turn};
use crate::chat::repository::MessageRepository;
use crate::llm::box_provider::BoxLlmProvider;
use crate::profile::estimator::ProfileEstimator;
use crate::profile::repository::ProfileRepository;

/// Tunables of the conversation cycle.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// How many recent messages are sent to the model.
    pub history_limit: u32,
    /// Sampling temperature of the primary reply.
    pub temperature: f64,
    /// A follow-up question is appended every `question_interval` exchanges.
    pub question_interval: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_limit: 20,
            temperature: 0.8,
            question_interval: 5,
        }
    }
}

/// Orchestrates one chat exchange.
///
/// Generic over the repository and verifier ports to maintain clean
/// architecture (mirrorchat-core never depends on mirrorchat-infra).
pub struct ConversationService<M, P, V>
where
    M: MessageRepository,
    P: ProfileRepository,
    V: TokenVerifier,
{
    messages: M,
    profiles: P,
    verifier: V,
    provider: BoxLlmProvider,
    config: ConversationConfig,
}

impl<M, P, V> ConversationService<M, P, V>
where
    M: MessageRepository,
    P: ProfileRepository,
    V: TokenVerifier,
{
    pub fn new(messages: M, profiles: P, verifier: V, provider: BoxLlmProvider) -> Self {
        Self {
            messages,
            profiles,
            verifier,
            provider,
            config: ConversationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ConversationConfig) -> Self {
        self.config = config;
        self
    }

    /// Handle one inbound user message and return the reply text.
    ///
    /// Missing token or message is a validation error and nothing is written.
    /// Once the token verifies, the user message is stored before anything
    /// else happens.
    #[tracing::instrument(name = "handle_chat", skip_all, fields(app_id = %app_id))]
    pub async fn handle_chat(
        &self,
        token: &str,
        message: &str,
        app_id: &str,
    ) -> Result<String, ChatError> {
        if token.is_empty() {
            return Err(ChatError::Validation("token is required".to_string()));
        }
        if message.trim().is_empty() {
            return Err(ChatError::Validation("message is required".to_string()));
        }

        let identity = self.verifier.verify(token).await?;
        let partition = Partition::new(app_id, identity.user_id);

        self.messages
            .append_message(&partition, MessageRole::User, message)
            .await?;

        let history = self.load_history(&partition).await?;
        let profile = self
            .profiles
            .get_profile(&partition)
            .await?
            .unwrap_or_default();
        let conversation_count = profile.conversation_count();

        let system = build_system_instruction(&profile);
        let request = CompletionRequest::chat(history, system, self.config.temperature);
        let mut reply = match self.provider.complete(&request).await {
            Ok(response) if response.content.trim().is_empty() => {
                warn!(
                    partition = %partition,
                    finish_reason = ?response.finish_reason,
                    "Primary generation returned no text"
                );
                return Err(ChatError::Generation(LlmError::Provider {
                    message: "empty reply".to_string(),
                }));
            }
            Ok(response) => response.content,
            Err(e) => {
                warn!(partition = %partition, error = %e, "Primary generation failed");
                return Err(ChatError::Generation(e));
            }
        };

        if is_follow_up_turn(conversation_count, self.config.question_interval) {
            if let Some(question) = self.follow_up_question(&profile, message, &reply).await {
                reply.push_str("\n\n");
                reply.push_str(&question);
            }
        }

        self.messages
            .append_message(&partition, MessageRole::Model, &reply)
            .await?;

        let conversation_count = self
            .update_profile(&partition, message, &profile, conversation_count)
            .await
            .unwrap_or(conversation_count);

        info!(
            partition = %partition,
            conversation_count,
            reply_len = reply.len(),
            "Exchange completed"
        );

        Ok(reply)
    }

    /// Recent history in chronological order.
    async fn load_history(&self, partition: &Partition) -> Result<Vec<Message>, ChatError> {
        let mut recent: Vec<ChatMessage> = self
            .messages
            .recent_messages(partition, self.config.history_limit)
            .await?;
        recent.reverse();

        Ok(recent
            .into_iter()
            .map(|m| Message {
                role: m.role,
                content: m.content,
            })
            .collect())
    }

    /// Ask for one follow-up question. Failures and empty answers yield `None`.
    async fn follow_up_question(
        &self,
        profile: &Profile,
        user_message: &str,
        reply: &str,
    ) -> Option<String> {
        let request =
            CompletionRequest::prompt(follow_up_question_prompt(profile, user_message, reply));
        match self.provider.complete(&request).await {
            Ok(response) => {
                let question = response.content.trim();
                (!question.is_empty()).then(|| question.to_string())
            }
            Err(e) => {
                warn!(error = %e, "Follow-up question generation failed; sending reply without it");
                None
            }
        }
    }

    /// Re-estimate the profile and merge-write it with the incremented counter.
    ///
    /// Returns the stored counter, or `None` when nothing was written. Every
    /// failure is logged and dropped; the caller's reply is unaffected.
    async fn update_profile(
        &self,
        partition: &Partition,
        user_message: &str,
        profile: &Profile,
        conversation_count: u64,
    ) -> Option<u64> {
        let mut update = match ProfileEstimator::estimate(&self.provider, user_message, profile).await {
            Ok(Some(update)) => update,
            Ok(None) => return None,
            Err(e) => {
                warn!(partition = %partition, error = %e, "Profile re-estimation failed");
                return None;
            }
        };

        update.set_conversation_count(conversation_count + 1);
        match self.profiles.merge_profile(partition, &update).await {
            Ok(merged) => Some(merged.conversation_count()),
            Err(e) => {
                warn!(partition = %partition, error = %e, "Profile update could not be stored");
                None
            }
        }
    }
}
