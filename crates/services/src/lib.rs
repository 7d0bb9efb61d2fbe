#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use config::QuizConfig;
pub use error::{BankLoadError, QuizError, QuizServicesError, RecordError};
pub use quiz::{AnswerRecorder, QuizController, QuizLoopService, SessionHandle};
