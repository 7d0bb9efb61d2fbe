use chrono::{DateTime, Utc};
use quiz_core::model::{SessionId, SessionState};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{decode_state, encode_state, session_id_from_i64, session_id_to_i64};
use crate::repository::{SessionRecord, SessionRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn map_record_row(row: &sqlx::sqlite::SqliteRow) -> Result<SessionRecord, StorageError> {
    let id = session_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let raw: String = row.try_get("state").map_err(ser)?;
    let updated_at = row.try_get("updated_at").map_err(ser)?;
    Ok(SessionRecord {
        id,
        state: decode_state(&raw)?,
        updated_at,
    })
}

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn load_session(&self, id: SessionId) -> Result<SessionState, StorageError> {
        match self.get_record(id).await {
            Ok(record) => Ok(record.state),
            Err(StorageError::NotFound) => Ok(SessionState::NotStarted),
            Err(e) => Err(e),
        }
    }

    async fn store_session(
        &self,
        id: SessionId,
        state: &SessionState,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let raw = encode_state(state)?;

        sqlx::query(
            r"
                INSERT INTO sessions (id, state, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(id) DO UPDATE SET
                    state = excluded.state,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(session_id_to_i64(id)?)
        .bind(raw)
        .bind(saved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        tracing::debug!(session = %id, "stored session state");
        Ok(())
    }

    async fn get_record(&self, id: SessionId) -> Result<SessionRecord, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, state, updated_at
                FROM sessions
                WHERE id = ?1
            ",
        )
        .bind(session_id_to_i64(id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_record_row(&row)
    }
}
