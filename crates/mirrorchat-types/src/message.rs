//! Chat message and partition types for Mirrorchat.
//!
//! Every message lives in exactly one [`Partition`]: the (application id,
//! user id) key space that isolates one user's history and profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Application id used when a request does not name one.
pub const DEFAULT_APP_ID: &str = "agent-infdof";

/// The (application id, user id) key isolating one user's data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    pub app_id: String,
    pub user_id: String,
}

impl Partition {
    pub fn new(app_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_id, self.user_id)
    }
}

/// A stored chat message. Immutable once written.
///
/// `created_at` is assigned by the store at append time; it is the only
/// ordering signal between messages of a partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub partition: Partition,
    pub role: MessageRole,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_display() {
        let p = Partition::new(DEFAULT_APP_ID, "uid-42");
        assert_eq!(p.to_string(), "agent-infdof/uid-42");
    }

    #[test]
    fn test_chat_message_serialize() {
        let msg = ChatMessage {
            id: Uuid::now_v7(),
            partition: Partition::new("app", "user"),
            role: MessageRole::User,
            content: "hello".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"createdAt\""));
    }
}
