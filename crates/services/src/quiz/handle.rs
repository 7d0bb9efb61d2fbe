use quiz_core::Clock;
use quiz_core::model::{SessionId, SessionState};
use storage::repository::{SessionRepository, StorageError};

/// Save capability for one session, bound to its id and the services clock.
///
/// The quiz flow calls [`SessionHandle::save`] at each persistence point.
#[derive(Clone, Copy)]
pub struct SessionHandle<'a> {
    id: SessionId,
    sessions: &'a dyn SessionRepository,
    clock: Clock,
}

impl<'a> SessionHandle<'a> {
    #[must_use]
    pub fn new(id: SessionId, sessions: &'a dyn SessionRepository, clock: Clock) -> Self {
        Self {
            id,
            sessions,
            clock,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Persist `state` for this session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository rejects the write.
    pub async fn save(&self, state: &SessionState) -> Result<(), StorageError> {
        self.sessions
            .store_session(self.id, state, self.clock.now())
            .await
    }
}
