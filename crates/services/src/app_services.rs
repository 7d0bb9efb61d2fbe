use std::sync::Arc;

use storage::repository::{SessionRepository, Storage};

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::QuizServicesError;
use crate::quiz::QuizLoopService;

/// Assembles the quiz services on top of a chosen storage backend.
#[derive(Clone)]
pub struct QuizServices {
    quiz_loop: Arc<QuizLoopService>,
    sessions: Arc<dyn SessionRepository>,
}

impl QuizServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, QuizServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, config))
    }

    /// Build services that keep sessions in process memory.
    #[must_use]
    pub fn in_memory(clock: Clock, config: QuizConfig) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, config)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, config: QuizConfig) -> Self {
        let sessions = Arc::clone(&storage.sessions);
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::new(config),
            Arc::clone(&sessions),
        ));
        Self {
            quiz_loop,
            sessions,
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<dyn SessionRepository> {
        Arc::clone(&self.sessions)
    }
}
