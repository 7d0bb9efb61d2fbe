use std::sync::Arc;

use quiz_core::model::{SessionId, SessionProgress, SessionState};
use storage::repository::SessionRepository;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::QuizError;
use super::controller::QuizController;
use super::handle::SessionHandle;

/// Orchestrates load → handle → save for messages addressed to a session id.
///
/// One message per session must be in flight at a time; the transport is
/// responsible for serializing deliveries to the same conversation.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
    controller: QuizController,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, config: Arc<QuizConfig>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self {
            clock,
            sessions,
            controller: QuizController::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        self.controller.config()
    }

    /// Feed one inbound message to the session and return the replies.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the session cannot be loaded or saved.
    pub async fn handle_message(
        &self,
        id: SessionId,
        message: &str,
    ) -> Result<Vec<String>, QuizError> {
        let mut state = self.sessions.load_session(id).await?;
        let handle = SessionHandle::new(id, self.sessions.as_ref(), self.clock);
        self.controller.handle(message, &mut state, &handle).await
    }

    /// Current state of the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the session cannot be loaded.
    pub async fn session_state(&self, id: SessionId) -> Result<SessionState, QuizError> {
        Ok(self.sessions.load_session(id).await?)
    }

    /// Progress of the session against the configured bank.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the session cannot be loaded.
    pub async fn progress(&self, id: SessionId) -> Result<SessionProgress, QuizError> {
        let state = self.sessions.load_session(id).await?;
        Ok(state.progress(self.config().bank().len()))
    }

    /// Drop any quiz in progress so the next message starts over.
    ///
    /// This is the way out of a stale session, which the answer path never
    /// modifies on its own.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the reset cannot be saved.
    pub async fn restart(&self, id: SessionId) -> Result<(), QuizError> {
        let handle = SessionHandle::new(id, self.sessions.as_ref(), self.clock);
        handle.save(&SessionState::NotStarted).await?;
        tracing::info!(session = %id, "session restarted");
        Ok(())
    }
}
