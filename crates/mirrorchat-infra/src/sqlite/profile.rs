//! SQLite profile repository implementation.
//!
//! One row per partition holding the profile document as JSON text. Merge
//! writes read and upsert inside a single writer transaction.

use chrono::Utc;
use sqlx::Row;

use mirrorchat_core::profile::repository::ProfileRepository;
use mirrorchat_types::error::RepositoryError;
use mirrorchat_types::message::Partition;
use mirrorchat_types::profile::{Profile, ProfileUpdate};

use super::format_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ProfileRepository`.
#[derive(Clone)]
pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn decode_profile(data: &str) -> Result<Profile, RepositoryError> {
    serde_json::from_str(data).map_err(|e| RepositoryError::InvalidDocument(e.to_string()))
}

impl ProfileRepository for SqliteProfileRepository {
    async fn get_profile(&self, partition: &Partition) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query("SELECT data FROM profiles WHERE app_id = ? AND user_id = ?")
            .bind(&partition.app_id)
            .bind(&partition.user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let data: String = row
                    .try_get("data")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                decode_profile(&data).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn merge_profile(
        &self,
        partition: &Partition,
        update: &ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT data FROM profiles WHERE app_id = ? AND user_id = ?")
                .bind(&partition.app_id)
                .bind(&partition.user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut profile = match existing {
            Some((data,)) => decode_profile(&data)?,
            None => Profile::default(),
        };
        profile.merge(update);

        let data = serde_json::to_string(&profile)
            .map_err(|e| RepositoryError::InvalidDocument(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO profiles (app_id, user_id, data, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(app_id, user_id) DO UPDATE SET
                   data = excluded.data,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&partition.app_id)
        .bind(&partition.user_id)
        .bind(&data)
        .bind(format_datetime(&Utc::now()))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(profile)
    }

    async fn delete_profile(&self, partition: &Partition) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM profiles WHERE app_id = ? AND user_id = ?")
            .bind(&partition.app_id)
            .bind(&partition.user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
