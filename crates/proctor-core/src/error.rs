//! Session error types.
//!
//! These errors represent misuse of the exam session API. Defined in
//! `proctor-core` so callers can distinguish recoverable upload problems
//! from internal navigation bugs without string matching.

use thiserror::Error;

/// Errors that can occur while setting up or driving an exam session.
#[derive(Debug, Error)]
pub enum ExamError {
    /// The loaded quiz contains no questions.
    #[error("quiz contains no questions")]
    EmptyQuiz,

    /// A navigation target outside the question list.
    #[error("question index {index} out of range (quiz has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },

    /// An answer operation referenced a question number not in the quiz.
    #[error("unknown question number: {0}")]
    UnknownQuestion(u32),

    /// An answer operation referenced an option the question does not have.
    #[error("question {number} has no option '{key}'")]
    UnknownOption { number: u32, key: String },

    /// A non-positive test duration.
    #[error("test duration must be at least 1 minute (got {0})")]
    InvalidDuration(u32),
}

impl ExamError {
    /// Returns `true` if this error indicates a bug in the driving code
    /// rather than a problem with user-supplied input. Internal errors are
    /// not expected to be user-reachable and should fail loudly.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ExamError::IndexOutOfRange { .. }
                | ExamError::UnknownQuestion(_)
                | ExamError::UnknownOption { .. }
        )
    }
}
