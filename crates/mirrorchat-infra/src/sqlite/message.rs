//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `mirrorchat-core` using sqlx. SELECTs go
//! to the reader pool, writes to the single writer connection.

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use mirrorchat_core::chat::repository::MessageRepository;
use mirrorchat_types::error::RepositoryError;
use mirrorchat_types::message::{ChatMessage, MessageRole, Partition};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    id: String,
    app_id: String,
    user_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            app_id: row.try_get("app_id")?,
            user_id: row.try_get("user_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;

        Ok(ChatMessage {
            id,
            partition: Partition::new(self.app_id, self.user_id),
            role: MessageRole::normalize(&self.role),
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// MessageRepository implementation
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn append_message(
        &self,
        partition: &Partition,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = ChatMessage {
            id: Uuid::now_v7(),
            partition: partition.clone(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO messages (id, app_id, user_id, role, content, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(&partition.app_id)
        .bind(&partition.user_id)
        .bind(role.to_string())
        .bind(content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(message)
    }

    async fn recent_messages(
        &self,
        partition: &Partition,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        // UUIDv7 ids break ties between rows written in the same microsecond.
        let rows = sqlx::query(
            r#"SELECT * FROM messages
               WHERE app_id = ? AND user_id = ?
               ORDER BY created_at DESC, id DESC
               LIMIT ?"#,
        )
        .bind(&partition.app_id)
        .bind(&partition.user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                MessageRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_message()
            })
            .collect()
    }

    async fn delete_messages(&self, partition: &Partition) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE app_id = ? AND user_id = ?")
            .bind(&partition.app_id)
            .bind(&partition.user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
