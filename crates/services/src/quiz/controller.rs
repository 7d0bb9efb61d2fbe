use std::sync::Arc;

use quiz_core::model::SessionState;
use quiz_core::render::{INVALID_SESSION_MESSAGE, final_report, format_question};

use crate::config::QuizConfig;
use crate::error::{QuizError, RecordError};
use super::handle::SessionHandle;
use super::recorder::AnswerRecorder;

/// Maps one incoming message and the session state to the bot's replies.
///
/// The caller owns the state; the controller mutates it in place and saves it
/// through the handle at the same points on every path except the
/// stale-index one, which leaves the state untouched and unsaved so the
/// request can be replayed.
#[derive(Debug, Clone)]
pub struct QuizController {
    config: Arc<QuizConfig>,
    recorder: AnswerRecorder,
}

impl QuizController {
    #[must_use]
    pub fn new(config: Arc<QuizConfig>) -> Self {
        let recorder = AnswerRecorder::new(Arc::clone(&config));
        Self { config, recorder }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Handle one message and return the replies to send, in order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if a save fails.
    pub async fn handle(
        &self,
        message: &str,
        state: &mut SessionState,
        handle: &SessionHandle<'_>,
    ) -> Result<Vec<String>, QuizError> {
        let SessionState::InProgress { index, .. } = *state else {
            return self.start(state, handle).await;
        };

        match self.recorder.record(message, index, state, handle).await {
            Ok(()) => {}
            Err(RecordError::InvalidQuestion { index, total }) => {
                tracing::warn!(
                    session = %handle.id(),
                    ?index,
                    total,
                    "session points outside the question bank"
                );
                return Ok(vec![INVALID_SESSION_MESSAGE.to_owned()]);
            }
            Err(RecordError::Storage(e)) => return Err(e.into()),
        }

        let next = index + 1;
        let total = self.config.bank().len();
        let reply = if next < total {
            if let SessionState::InProgress { index, .. } = &mut *state {
                *index = next;
            }
            tracing::debug!(session = %handle.id(), index = next, "advanced to next question");
            format_question(self.config.bank(), next)
        } else {
            let report = final_report(state, total);
            tracing::info!(
                session = %handle.id(),
                correct = state.correct_count(),
                total,
                "quiz completed"
            );
            *state = SessionState::NotStarted;
            report
        };

        handle.save(state).await?;
        Ok(vec![reply])
    }

    /// Any message while no quiz is running starts one; its text is ignored.
    async fn start(
        &self,
        state: &mut SessionState,
        handle: &SessionHandle<'_>,
    ) -> Result<Vec<String>, QuizError> {
        *state = SessionState::started();
        let replies = vec![
            self.config.welcome_message().to_owned(),
            format_question(self.config.bank(), 0),
        ];
        handle.save(state).await?;
        tracing::debug!(session = %handle.id(), "started quiz");
        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::Clock;
    use quiz_core::model::{AnswerRecord, Question, QuestionBank, SessionId};
    use quiz_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, SessionRepository};

    fn controller() -> QuizController {
        let questions = vec![
            Question::new("Q1?", vec!["a".into(), "b".into()], "a").unwrap(),
            Question::new("Q2?", vec!["c".into(), "d".into()], "d").unwrap(),
            Question::new("Q3?", vec!["e".into()], "e").unwrap(),
        ];
        let bank = QuestionBank::new(questions).unwrap();
        QuizController::new(Arc::new(QuizConfig::new(bank, "Welcome!")))
    }

    #[tokio::test]
    async fn start_ignores_message_and_saves_once() {
        let repo = InMemoryRepository::new();
        let id = SessionId::new(1);
        let handle = SessionHandle::new(id, &repo, Clock::fixed(fixed_now()));
        let mut state = SessionState::NotStarted;

        let replies = controller().handle("a", &mut state, &handle).await.unwrap();

        assert_eq!(replies, vec!["Welcome!".to_owned(), "Q1?\n1. a\n2. b".to_owned()]);
        assert_eq!(state, SessionState::started());
        assert_eq!(repo.save_count(id).unwrap(), 1);
    }

    #[tokio::test]
    async fn answer_advances_and_saves_twice() {
        let repo = InMemoryRepository::new();
        let id = SessionId::new(1);
        let handle = SessionHandle::new(id, &repo, Clock::fixed(fixed_now()));
        let mut state = SessionState::started();

        let replies = controller().handle("B", &mut state, &handle).await.unwrap();

        assert_eq!(replies, vec!["Q2?\n1. c\n2. d".to_owned()]);
        assert_eq!(state.current_index(), Some(1));
        assert!(!state.answers().unwrap()[&0].is_correct());
        // recorder save + controller save
        assert_eq!(repo.save_count(id).unwrap(), 2);
        assert_eq!(repo.load_session(id).await.unwrap(), state);
    }

    #[tokio::test]
    async fn last_answer_reports_and_resets() {
        let repo = InMemoryRepository::new();
        let handle = SessionHandle::new(SessionId::new(1), &repo, Clock::fixed(fixed_now()));
        let mut answers = std::collections::BTreeMap::new();
        answers.insert(0, AnswerRecord::from_persisted("a".into(), true));
        let mut state = SessionState::InProgress { index: 2, answers };

        let replies = controller().handle(" E ", &mut state, &handle).await.unwrap();

        assert_eq!(
            replies,
            vec![
                "Quiz complete! You answered 2 out of 3 questions correctly. \
                 Thank you for participating!"
                    .to_owned()
            ]
        );
        assert_eq!(state, SessionState::NotStarted);
    }

    #[tokio::test]
    async fn stale_index_replies_without_touching_state() {
        let repo = InMemoryRepository::new();
        let id = SessionId::new(5);
        let handle = SessionHandle::new(id, &repo, Clock::fixed(fixed_now()));
        let mut answers = std::collections::BTreeMap::new();
        answers.insert(0, AnswerRecord::from_persisted("a".into(), true));
        let mut state = SessionState::InProgress { index: 7, answers };
        let before = state.clone();

        let replies = controller().handle("a", &mut state, &handle).await.unwrap();

        assert_eq!(replies, vec![INVALID_SESSION_MESSAGE.to_owned()]);
        assert_eq!(state, before);
        assert_eq!(repo.save_count(id).unwrap(), 0);
    }
}
