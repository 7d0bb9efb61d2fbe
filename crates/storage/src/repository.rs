use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{SessionId, SessionState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a session: its state plus when it was last saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub state: SessionState,
    pub updated_at: DateTime<Utc>,
}

/// Repository contract for per-conversation quiz state.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fetch the state of a session.
    ///
    /// Unknown sessions are `SessionState::NotStarted`; this never returns
    /// `StorageError::NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or the stored state
    /// cannot be decoded.
    async fn load_session(&self, id: SessionId) -> Result<SessionState, StorageError>;

    /// Persist the full state of a session, replacing any previous value.
    ///
    /// Saving an unchanged state again is harmless.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be stored.
    async fn store_session(
        &self,
        id: SessionId,
        state: &SessionState,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Fetch the stored record, including its save timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the session was never saved.
    async fn get_record(&self, id: SessionId) -> Result<SessionRecord, StorageError>;
}

#[derive(Debug, Clone)]
struct MemEntry {
    state: SessionState,
    updated_at: DateTime<Utc>,
    saves: usize,
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Counts saves per session so callers can observe when the flow persists.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sessions: Arc<Mutex<HashMap<SessionId, MemEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of `store_session` calls for `id` so far.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn save_count(&self, id: SessionId) -> Result<usize, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).map_or(0, |entry| entry.saves))
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn load_session(&self, id: SessionId) -> Result<SessionState, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&id)
            .map(|entry| entry.state.clone())
            .unwrap_or_default())
    }

    async fn store_session(
        &self,
        id: SessionId,
        state: &SessionState,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let entry = guard.entry(id).or_insert_with(|| MemEntry {
            state: SessionState::NotStarted,
            updated_at: saved_at,
            saves: 0,
        });
        entry.state = state.clone();
        entry.updated_at = saved_at;
        entry.saves += 1;
        Ok(())
    }

    async fn get_record(&self, id: SessionId) -> Result<SessionRecord, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&id)
            .map(|entry| SessionRecord {
                id,
                state: entry.state.clone(),
                updated_at: entry.updated_at,
            })
            .ok_or(StorageError::NotFound)
    }
}

/// Session store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let sessions: Arc<dyn SessionRepository> = Arc::new(InMemoryRepository::new());
        Self { sessions }
    }
}
