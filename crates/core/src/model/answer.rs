use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Stored result of scoring one submitted answer.
///
/// Correctness is decided once, when the answer is recorded, and never
/// recomputed against a later version of the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    user_answer: String,
    is_correct: bool,
}

impl AnswerRecord {
    /// Score `raw` against `question`, keeping the trimmed input.
    #[must_use]
    pub fn score(question: &Question, raw: &str) -> Self {
        Self {
            user_answer: raw.trim().to_owned(),
            is_correct: question.is_correct(raw),
        }
    }

    /// Rehydrate a record from persisted storage.
    #[must_use]
    pub fn from_persisted(user_answer: String, is_correct: bool) -> Self {
        Self {
            user_answer,
            is_correct,
        }
    }

    #[must_use]
    pub fn user_answer(&self) -> &str {
        &self.user_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_trimmed_input_and_scores_it() {
        let q = Question::new("2+2?", vec!["3".into(), "4".into()], "4").unwrap();
        let record = AnswerRecord::score(&q, "  4\n");
        assert_eq!(record.user_answer(), "4");
        assert!(record.is_correct());
    }

    #[test]
    fn whitespace_only_answer_is_accepted_as_wrong() {
        let q = Question::new("2+2?", vec!["4".into()], "4").unwrap();
        let record = AnswerRecord::score(&q, "   ");
        assert_eq!(record.user_answer(), "");
        assert!(!record.is_correct());
    }
}
