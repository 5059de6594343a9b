//! Core data model types for proctor.
//!
//! These are the fundamental types the entire proctor system uses to
//! represent quizzes, questions, and answer options. They are immutable
//! once a quiz has been loaded and validated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single answer option presented to the test-taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option key (e.g. "A"). Unique within a question.
    pub key: String,
    /// Human-readable option label.
    pub label: String,
}

/// A single exam question.
///
/// Options keep their source order, which is also their display order.
/// `correct` holds the set of correct option keys; whether the question is
/// single- or multi-choice is derived from its cardinality, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Stable question number from the quiz file. Unique, but not
    /// necessarily contiguous; navigation uses list position instead.
    pub number: u32,
    /// The question text.
    pub text: String,
    /// Answer options in display order.
    pub options: Vec<AnswerOption>,
    /// Correct option keys (at least one).
    pub correct: Vec<String>,
}

/// Classification of a question by how many options are correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one correct option; selection replaces (radio semantics).
    Single,
    /// More than one correct option; selection toggles (checkbox semantics).
    Multi,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Single => write!(f, "single-choice"),
            QuestionKind::Multi => write!(f, "multi-choice"),
        }
    }
}

impl Question {
    /// Derived single/multi classification.
    pub fn kind(&self) -> QuestionKind {
        if self.correct.len() == 1 {
            QuestionKind::Single
        } else {
            QuestionKind::Multi
        }
    }

    /// Returns `true` if `key` names one of this question's options.
    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|o| o.key == key)
    }

    /// Label for an option key, if present.
    pub fn option_label(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.label.as_str())
    }

    /// Correct keys in canonical (sorted) order, for order-independent
    /// comparison and deterministic display.
    pub fn correct_keys_sorted(&self) -> Vec<String> {
        let mut keys = self.correct.clone();
        keys.sort();
        keys
    }
}

/// An ordered, non-empty list of questions loaded from one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Where the quiz came from (file path), for display and logging.
    #[serde(default)]
    pub source: Option<String>,
    /// The questions, in navigation order.
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the quiz has no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at a navigation index.
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Question with a given stable number.
    pub fn by_number(&self, number: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.number == number)
    }

    /// Navigation index of the question with a given number.
    pub fn position_of(&self, number: u32) -> Option<usize> {
        self.questions.iter().position(|q| q.number == number)
    }
}
