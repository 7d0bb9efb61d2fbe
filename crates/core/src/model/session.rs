use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::AnswerRecord;

/// Quiz progress for one conversation.
///
/// `NotStarted` is both the initial shape and the shape a finished quiz
/// returns to, so a completed session can simply be played again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NotStarted,
    InProgress {
        /// Question awaiting an answer.
        index: usize,
        answers: BTreeMap<usize, AnswerRecord>,
    },
}

impl SessionState {
    /// Fresh in-progress state pointing at the first question.
    #[must_use]
    pub fn started() -> Self {
        Self::InProgress {
            index: 0,
            answers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress { .. })
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self {
            Self::NotStarted => None,
            Self::InProgress { index, .. } => Some(*index),
        }
    }

    /// Recorded answers; empty when no quiz is running.
    #[must_use]
    pub fn answers(&self) -> Option<&BTreeMap<usize, AnswerRecord>> {
        match self {
            Self::NotStarted => None,
            Self::InProgress { answers, .. } => Some(answers),
        }
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers()
            .map_or(0, |answers| answers.values().filter(|a| a.is_correct()).count())
    }

    /// Summary of progress against a bank of `total` questions.
    #[must_use]
    pub fn progress(&self, total: usize) -> SessionProgress {
        let answered = self.answers().map_or(0, BTreeMap::len);
        SessionProgress {
            total,
            answered,
            correct: self.correct_count(),
            remaining: total.saturating_sub(answered),
        }
    }
}

/// Aggregated view of session progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub remaining: usize,
}
