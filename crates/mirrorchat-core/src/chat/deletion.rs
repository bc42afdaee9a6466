//! Deletion service wiping one partition's messages and profile.
//!
//! Deletion is best-effort, not transactional: if the store fails halfway
//! some messages may already be gone. Running it again is always safe.

use tracing::info;

use mirrorchat_types::error::ChatError;
use mirrorchat_types::identity::AuthError;
use mirrorchat_types::message::Partition;

use crate::auth::verifier::TokenVerifier;
use crate::chat::repository::MessageRepository;
use crate::profile::repository::ProfileRepository;

/// What a deletion removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletionSummary {
    pub messages_deleted: u64,
    pub profile_deleted: bool,
}

/// Removes every message and the profile of the caller's partition.
pub struct DeletionService<M, P, V>
where
    M: MessageRepository,
    P: ProfileRepository,
    V: TokenVerifier,
{
    messages: M,
    profiles: P,
    verifier: V,
}

impl<M, P, V> DeletionService<M, P, V>
where
    M: MessageRepository,
    P: ProfileRepository,
    V: TokenVerifier,
{
    pub fn new(messages: M, profiles: P, verifier: V) -> Self {
        Self {
            messages,
            profiles,
            verifier,
        }
    }

    /// Delete the caller's data. Succeeds on an already-empty partition.
    #[tracing::instrument(name = "handle_delete", skip_all, fields(app_id = %app_id))]
    pub async fn handle_delete(
        &self,
        token: &str,
        app_id: &str,
    ) -> Result<DeletionSummary, ChatError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken.into());
        }
        let identity = self.verifier.verify(token).await?;
        let partition = Partition::new(app_id, identity.user_id);

        let messages_deleted = self.messages.delete_messages(&partition).await?;
        let profile_deleted = self.profiles.delete_profile(&partition).await?;

        info!(
            partition = %partition,
            messages_deleted,
            profile_deleted,
            "Partition data deleted"
        );

        Ok(DeletionSummary {
            messages_deleted,
            profile_deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use mirrorchat_types::message::MessageRole;

    use crate::test_support::{
        CallLog, FakeMessages, FakeProfiles, FakeVerifier, GOOD_TOKEN, USER_ID,
    };

    const APP: &str = "test-app";

    struct Harness {
        log: CallLog,
        messages: FakeMessages,
        profiles: FakeProfiles,
        service: DeletionService<FakeMessages, FakeProfiles, FakeVerifier>,
    }

    fn harness() -> Harness {
        let log = CallLog::default();
        let messages = FakeMessages::new(log.clone());
        let profiles = FakeProfiles::new(log.clone());
        let service = DeletionService::new(
            messages.clone(),
            profiles.clone(),
            FakeVerifier::new(log.clone()),
        );
        Harness {
            log,
            messages,
            profiles,
            service,
        }
    }

    async fn seed(h: &Harness, partition: &Partition) {
        for content in ["hi", "hello", "how are you"] {
            h.messages
                .append_message(partition, MessageRole::User, content)
                .await
                .unwrap();
        }
        h.profiles
            .seed(partition, json!({"openness": 0.4, "conversationCount": 3}));
    }

    #[tokio::test]
    async fn test_delete_removes_partition_and_is_idempotent() {
        let h = harness();
        let mine = Partition::new(APP, USER_ID);
        let other = Partition::new(APP, "someone-else");
        seed(&h, &mine).await;
        seed(&h, &other).await;

        let first = h.service.handle_delete(GOOD_TOKEN, APP).await.unwrap();
        assert_eq!(
            first,
            DeletionSummary {
                messages_deleted: 3,
                profile_deleted: true
            }
        );
        assert!(h.messages.all(&mine).is_empty());
        assert!(h.profiles.current(&mine).is_none());

        let second = h.service.handle_delete(GOOD_TOKEN, APP).await.unwrap();
        assert_eq!(second, DeletionSummary::default());

        assert_eq!(h.messages.all(&other).len(), 3);
        assert!(h.profiles.current(&other).is_some());
    }

    #[tokio::test]
    async fn test_invalid_token_deletes_nothing() {
        let h = harness();
        let mine = Partition::new(APP, USER_ID);
        seed(&h, &mine).await;
        let before = h.log.entries().len();

        let err = h.service.handle_delete("forged", APP).await.unwrap_err();
        assert!(matches!(err, ChatError::Authentication(_)));
        let entries = h.log.entries();
        assert_eq!(entries.len(), before + 1);
        assert_eq!(entries.last().map(String::as_str), Some("verify"));
        assert_eq!(h.messages.all(&mine).len(), 3);
        assert!(h.profiles.current(&mine).is_some());
    }

    #[tokio::test]
    async fn test_missing_token_is_auth_error() {
        let h = harness();
        let err = h.service.handle_delete("", APP).await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Authentication(AuthError::MissingToken)
        ));
        assert!(h.log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_persistence_error() {
        let h = harness();
        h.messages.fail_deletes();

        let err = h.service.handle_delete(GOOD_TOKEN, APP).await.unwrap_err();
        assert!(matches!(err, ChatError::Persistence(_)));
        assert!(!h.log.entries().contains(&"delete_profile".to_string()));
    }
}
