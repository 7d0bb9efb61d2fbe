//! User-facing text produced by the quiz flow.

use crate::model::{Question, QuestionBank, SessionState};

/// Greeting sent before the first question when no welcome text is configured.
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Hello! I'm the Python quiz bot. Answer each question by typing the option text.";

/// Reply for a session whose stored index no longer points into the bank.
pub const INVALID_SESSION_MESSAGE: &str =
    "Invalid question or session expired. Please restart the quiz.";

/// Render a question followed by its options, numbered from 1.
#[must_use]
pub fn render_question(question: &Question) -> String {
    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(n, option)| format!("{}. {option}", n + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{options}", question.question_text())
        .trim()
        .to_owned()
}

/// Render the question at `index`.
///
/// # Panics
///
/// Panics if `index` is out of range; callers check bounds before asking.
#[must_use]
pub fn format_question(bank: &QuestionBank, index: usize) -> String {
    render_question(&bank.questions()[index])
}

/// Closing message with the number of correct answers out of the bank size.
///
/// The total is the bank length, not the number of recorded answers.
#[must_use]
pub fn final_report(state: &SessionState, total: usize) -> String {
    let correct = state.correct_count();
    format!(
        "Quiz complete! You answered {correct} out of {total} questions correctly. \
         Thank you for participating!"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::AnswerRecord;

    fn question(text: &str, options: &[&str], answer: &str) -> Question {
        Question::new(
            text,
            options.iter().map(|s| (*s).to_string()).collect(),
            answer,
        )
        .unwrap()
    }

    #[test]
    fn formats_options_in_declared_order() {
        let bank = QuestionBank::new(vec![question("Q?", &["A", "B"], "A")]).unwrap();
        assert_eq!(format_question(&bank, 0), "Q?\n1. A\n2. B");
    }

    #[test]
    fn numbers_every_option_on_its_own_line() {
        let q = question("Which?", &["one", "two", "three"], "two");
        let rendered = render_question(&q);
        assert_eq!(rendered, "Which?\n1. one\n2. two\n3. three");
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn trims_trailing_whitespace_of_last_option() {
        let q = question("Pick one", &["x", "y  "], "x");
        assert_eq!(render_question(&q), "Pick one\n1. x\n2. y");
    }

    #[test]
    fn report_counts_correct_against_bank_size() {
        let mut answers = BTreeMap::new();
        answers.insert(0, AnswerRecord::from_persisted("4".into(), true));
        answers.insert(1, AnswerRecord::from_persisted("rome".into(), false));
        let state = SessionState::InProgress { index: 2, answers };

        assert_eq!(
            final_report(&state, 3),
            "Quiz complete! You answered 1 out of 3 questions correctly. \
             Thank you for participating!"
        );
    }

    #[test]
    fn report_on_cleared_session_counts_zero() {
        assert_eq!(
            final_report(&SessionState::NotStarted, 2),
            "Quiz complete! You answered 0 out of 2 questions correctly. \
             Thank you for participating!"
        );
    }
}
