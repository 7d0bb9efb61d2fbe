use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must have at least one option")]
    NoOptions,

    #[error("option {position} cannot be empty")]
    EmptyOption { position: usize },

    #[error("canonical answer cannot be empty")]
    EmptyAnswer,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank must contain at least one question")]
    Empty,

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with its canonical answer.
///
/// Options keep their declared order; they are only ever shown, never stored by
/// position, so answers are matched against `answer` as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    question_text: String,
    options: Vec<String>,
    answer: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text, any option, or the answer is blank,
    /// or if no options are given.
    pub fn new(
        question_text: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let question = Self {
            question_text: question_text.into(),
            options,
            answer: answer.into(),
        };
        question.validate()?;
        Ok(question)
    }

    /// Check a question that was built by deserialization.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Question::new`].
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.question_text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if let Some(pos) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { position: pos + 1 });
        }
        if self.answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        Ok(())
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Whether `submitted` matches the canonical answer, ignoring case and
    /// surrounding whitespace on both sides.
    #[must_use]
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.trim().to_lowercase() == self.answer.trim().to_lowercase()
    }
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Fixed, ordered list of questions used for every session of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `QuestionBankError::Empty` for an empty list, or
    /// `QuestionBankError::InvalidQuestion` naming the first invalid entry.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        for (index, question) in questions.iter().enumerate() {
            question
                .validate()
                .map_err(|source| QuestionBankError::InvalidQuestion { index, source })?;
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn matching_ignores_case_and_whitespace() {
        let q = Question::new("Pick", opts(&["A", "B"]), "B").unwrap();
        assert!(q.is_correct(" b "));
        assert!(q.is_correct("B"));
        assert!(!q.is_correct("a"));
        assert!(!q.is_correct(""));
    }

    #[test]
    fn canonical_answer_is_trimmed_too() {
        let q = Question::new("Pick", opts(&["Paris"]), "  Paris ").unwrap();
        assert!(q.is_correct("paris"));
    }

    #[test]
    fn rejects_question_without_options() {
        let err = Question::new("Q?", Vec::new(), "A").unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn rejects_blank_option_with_position() {
        let err = Question::new("Q?", opts(&["A", " "]), "A").unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { position: 2 });
    }

    #[test]
    fn bank_rejects_empty_list() {
        assert_eq!(QuestionBank::new(Vec::new()), Err(QuestionBankError::Empty));
    }

    #[test]
    fn bank_reports_index_of_invalid_deserialized_question() {
        let questions: Vec<Question> = serde_json::from_str(
            r#"[
                {"question_text": "Q1", "options": ["A"], "answer": "A"},
                {"question_text": "", "options": ["A"], "answer": "A"}
            ]"#,
        )
        .unwrap();
        let err = QuestionBank::new(questions).unwrap_err();
        assert_eq!(
            err,
            QuestionBankError::InvalidQuestion {
                index: 1,
                source: QuestionError::EmptyText,
            }
        );
    }
}
