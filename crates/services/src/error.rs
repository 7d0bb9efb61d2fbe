//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionBankError;
use quiz_core::render::INVALID_SESSION_MESSAGE;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while handling a quiz message.
///
/// A stale question index is not one of these; it is answered with a reply.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AnswerRecorder`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    /// The session points at no question of the bank.
    #[error("{}", INVALID_SESSION_MESSAGE)]
    InvalidQuestion { index: Option<usize>, total: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed question bank: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] QuestionBankError),
}

/// Errors emitted while bootstrapping quiz services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Bank(#[from] BankLoadError),
}
