//! Process-wide quiz configuration: the question bank and the welcome text.

use std::path::Path;

use serde::Deserialize;

use quiz_core::model::{Question, QuestionBank};
use quiz_core::render::DEFAULT_WELCOME_MESSAGE;

use crate::error::BankLoadError;

const BUILTIN_BANK: &str = include_str!("../data/python_questions.json");

/// Accepted bank file shapes: a bare question list, or a document that can
/// also carry its own welcome text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BankDocument {
    List(Vec<Question>),
    Document {
        #[serde(default)]
        welcome_message: Option<String>,
        questions: Vec<Question>,
    },
}

/// Immutable configuration shared by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    bank: QuestionBank,
    welcome_message: String,
}

impl QuizConfig {
    #[must_use]
    pub fn new(bank: QuestionBank, welcome_message: impl Into<String>) -> Self {
        Self {
            bank,
            welcome_message: welcome_message.into(),
        }
    }

    /// The Python question bank shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError` if the bundled file is malformed.
    pub fn builtin() -> Result<Self, BankLoadError> {
        Self::from_json_str(BUILTIN_BANK)
    }

    /// Parse a bank from JSON.
    ///
    /// Documents without a `welcome_message` use [`DEFAULT_WELCOME_MESSAGE`].
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError::Json` for malformed input and
    /// `BankLoadError::Invalid` if the questions fail validation.
    pub fn from_json_str(raw: &str) -> Result<Self, BankLoadError> {
        let (welcome, questions) = match serde_json::from_str::<BankDocument>(raw)? {
            BankDocument::List(questions) => (None, questions),
            BankDocument::Document {
                welcome_message,
                questions,
            } => (welcome_message, questions),
        };
        let bank = QuestionBank::new(questions)?;
        Ok(Self::new(
            bank,
            welcome.unwrap_or_else(|| DEFAULT_WELCOME_MESSAGE.to_owned()),
        ))
    }

    /// Read and parse a bank file.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError::Io` if the file cannot be read, otherwise as
    /// [`QuizConfig::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, BankLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| BankLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            questions = config.bank.len(),
            "loaded question bank"
        );
        Ok(config)
    }

    #[must_use]
    pub fn with_welcome_message(mut self, welcome_message: impl Into<String>) -> Self {
        self.welcome_message = welcome_message.into();
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn welcome_message(&self) -> &str {
        &self.welcome_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionBankError;

    #[test]
    fn builtin_bank_loads() {
        let config = QuizConfig::builtin().unwrap();
        assert_eq!(config.bank().len(), 5);
        assert!(!config.welcome_message().is_empty());
    }

    #[test]
    fn bare_list_uses_default_welcome() {
        let config = QuizConfig::from_json_str(
            r#"[{"question_text": "Q?", "options": ["A", "B"], "answer": "A"}]"#,
        )
        .unwrap();
        assert_eq!(config.welcome_message(), DEFAULT_WELCOME_MESSAGE);
        assert_eq!(config.bank().len(), 1);
    }

    #[test]
    fn document_welcome_can_be_overridden() {
        let config = QuizConfig::from_json_str(
            r#"{"welcome_message": "Hi", "questions": [
                {"question_text": "Q?", "options": ["A"], "answer": "A"}
            ]}"#,
        )
        .unwrap()
        .with_welcome_message("Welcome!");
        assert_eq!(config.welcome_message(), "Welcome!");
    }

    #[test]
    fn empty_bank_is_rejected() {
        let err = QuizConfig::from_json_str("[]").unwrap_err();
        assert!(matches!(err, BankLoadError::Invalid(QuestionBankError::Empty)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = QuizConfig::from_path(Path::new("/nonexistent/bank.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bank.json"));
    }
}
