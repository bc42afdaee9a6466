//! MessageRepository trait definition.
//!
//! Follows the same RPITIT pattern as the other ports in this crate.

use mirrorchat_types::error::RepositoryError;
use mirrorchat_types::message::{ChatMessage, MessageRole, Partition};

/// Append-only, time-ordered message history per partition.
///
/// Implementations live in mirrorchat-infra (e.g., `SqliteMessageRepository`).
pub trait MessageRepository: Send + Sync {
    /// Append a message. The store assigns the id and the `created_at` timestamp.
    fn append_message(
        &self,
        partition: &Partition,
        role: MessageRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// The most recent `limit` messages, ordered by created_at DESC.
    fn recent_messages(
        &self,
        partition: &Partition,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Delete every message in the partition. Returns how many were removed.
    fn delete_messages(
        &self,
        partition: &Partition,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
