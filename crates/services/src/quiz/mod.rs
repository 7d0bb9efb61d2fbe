mod controller;
mod handle;
mod recorder;
mod workflow;

// Public API of the quiz subsystem.
pub use controller::QuizController;
pub use handle::SessionHandle;
pub use recorder::AnswerRecorder;
pub use workflow::QuizLoopService;
