use std::sync::Arc;

use quiz_core::model::{AnswerRecord, SessionState};

use crate::config::QuizConfig;
use crate::error::RecordError;
use super::handle::SessionHandle;

/// Scores and stores the answer for the current question.
#[derive(Debug, Clone)]
pub struct AnswerRecorder {
    config: Arc<QuizConfig>,
}

impl AnswerRecorder {
    #[must_use]
    pub fn new(config: Arc<QuizConfig>) -> Self {
        Self { config }
    }

    /// Record `answer` for question `index` and save the session.
    ///
    /// Any text is accepted; it is trimmed and scored, never rejected. A prior
    /// record at the same index is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidQuestion` without touching `state` when
    /// `index` is outside the bank or no quiz is running, and
    /// `RecordError::Storage` if the save fails.
    pub async fn record(
        &self,
        answer: &str,
        index: usize,
        state: &mut SessionState,
        handle: &SessionHandle<'_>,
    ) -> Result<(), RecordError> {
        let total = self.config.bank().len();
        let Some(question) = self.config.bank().get(index) else {
            return Err(RecordError::InvalidQuestion {
                index: Some(index),
                total,
            });
        };
        let SessionState::InProgress { answers, .. } = &mut *state else {
            return Err(RecordError::InvalidQuestion { index: None, total });
        };

        let record = AnswerRecord::score(question, answer);
        tracing::debug!(
            session = %handle.id(),
            index,
            is_correct = record.is_correct(),
            "recorded answer"
        );
        answers.insert(index, record);
        handle.save(state).await?;
        Ok(())
    }
}
