mod answer;
mod ids;
mod question;
mod session;

pub use ids::{ParseIdError, SessionId};

pub use answer::AnswerRecord;
pub use question::{Question, QuestionBank, QuestionBankError, QuestionError};
pub use session::{SessionProgress, SessionState};
