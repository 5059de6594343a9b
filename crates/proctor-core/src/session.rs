//! Session state container.
//!
//! `SessionStore` is the single owner of the active exam session: the
//! loaded quiz, the answer map, review marks, the countdown, and the
//! session phase. All mutation goes through it (or through the engine,
//! which holds it), so the state transitions in one place and in one
//! order. There is exactly one logical actor, so no locking is needed.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ExamError;
use crate::model::Quiz;

/// Session-wide configuration. Survives session resets: a new upload
/// clears answers and marks but keeps the configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Total test time in minutes.
    pub total_minutes: u32,
}

impl SessionConfig {
    /// Total test time in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.total_minutes * 60
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { total_minutes: 20 }
    }
}

/// Whether the session is still accepting mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Finished,
}

/// The complete state of one exam attempt.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) quiz: Quiz,
    pub(crate) answers: BTreeMap<u32, BTreeSet<String>>,
    pub(crate) marked: BTreeSet<u32>,
    pub(crate) current_index: usize,
    /// The duration this session was started with. A later
    /// `set_duration` changes the config, not a running session.
    pub(crate) total_seconds: u32,
    pub(crate) remaining_seconds: u32,
    pub(crate) phase: Phase,
    /// Frozen at finish; `None` while in progress.
    pub(crate) elapsed_seconds: Option<u32>,
}

impl SessionState {
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Elapsed time frozen at finish.
    pub fn elapsed_seconds(&self) -> Option<u32> {
        self.elapsed_seconds
    }

    /// The one "has an answer" predicate: an entry exists and is
    /// non-empty. Navigation highlighting and scoring both use this.
    pub fn is_answered(&self, number: u32) -> bool {
        self.answers.get(&number).is_some_and(|s| !s.is_empty())
    }

    /// Question numbers with a non-empty selection, ascending.
    pub fn answered_numbers(&self) -> Vec<u32> {
        self.answers
            .iter()
            .filter(|(_, sel)| !sel.is_empty())
            .map(|(n, _)| *n)
            .collect()
    }

    /// Question numbers flagged for review, ascending.
    pub fn marked_numbers(&self) -> Vec<u32> {
        self.marked.iter().copied().collect()
    }

    /// Returns `true` if the question is marked for review.
    pub fn is_marked(&self, number: u32) -> bool {
        self.marked.contains(&number)
    }

    /// Current selection for a question, in canonical (sorted) order.
    pub fn selection(&self, number: u32) -> Vec<String> {
        self.answers
            .get(&number)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The full answer map.
    pub fn answers(&self) -> &BTreeMap<u32, BTreeSet<String>> {
        &self.answers
    }
}

/// Holder for the single active session and its configuration.
#[derive(Debug, Default)]
pub struct SessionStore {
    config: SessionConfig,
    state: Option<SessionState>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Update the configured duration. Only affects the *next*
    /// `initialize`; a running session keeps its countdown.
    pub fn set_duration(&mut self, minutes: u32) -> Result<(), ExamError> {
        if minutes == 0 {
            return Err(ExamError::InvalidDuration(minutes));
        }
        self.config.total_minutes = minutes;
        Ok(())
    }

    /// Start a fresh session for a validated quiz. Any previous answers,
    /// marks, and countdown are discarded.
    pub fn initialize(&mut self, quiz: Quiz) -> Result<(), ExamError> {
        if quiz.is_empty() {
            return Err(ExamError::EmptyQuiz);
        }
        tracing::info!(
            questions = quiz.len(),
            minutes = self.config.total_minutes,
            "starting exam session"
        );
        self.state = Some(SessionState {
            quiz,
            answers: BTreeMap::new(),
            marked: BTreeSet::new(),
            current_index: 0,
            total_seconds: self.config.total_seconds(),
            remaining_seconds: self.config.total_seconds(),
            phase: Phase::InProgress,
            elapsed_seconds: None,
        });
        Ok(())
    }

    /// Freeze the session for scoring. A second call while already
    /// finished is a no-op; the first finish wins.
    pub fn finish(&mut self, elapsed_seconds: u32) {
        if let Some(state) = &mut self.state {
            if state.phase == Phase::Finished {
                tracing::debug!("ignoring duplicate finish");
                return;
            }
            state.phase = Phase::Finished;
            state.elapsed_seconds = Some(elapsed_seconds);
            tracing::info!(elapsed_seconds, "exam session finished");
        }
    }

    /// Drop the active session entirely. The configured duration is kept.
    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub(crate) fn state_mut(&mut self) -> Option<&mut SessionState> {
        self.state.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, Question};

    fn quiz() -> Quiz {
        Quiz {
            source: None,
            questions: vec![Question {
                number: 1,
                text: "q".into(),
                options: vec![AnswerOption {
                    key: "A".into(),
                    label: "x".into(),
                }],
                correct: vec!["A".into()],
            }],
        }
    }

    #[test]
    fn default_duration_is_twenty_minutes() {
        let config = SessionConfig::default();
        assert_eq!(config.total_minutes, 20);
        assert_eq!(config.total_seconds(), 1200);
    }

    #[test]
    fn initialize_rejects_empty_quiz() {
        let mut store = SessionStore::new(SessionConfig::default());
        let empty = Quiz {
            source: None,
            questions: vec![],
        };
        assert!(matches!(
            store.initialize(empty),
            Err(ExamError::EmptyQuiz)
        ));
        assert!(store.state().is_none());
    }

    #[test]
    fn initialize_resets_to_fresh_state() {
        let mut store = SessionStore::new(SessionConfig { total_minutes: 1 });
        store.initialize(quiz()).unwrap();

        let state = store.state().unwrap();
        assert_eq!(state.phase(), Phase::InProgress);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.remaining_seconds(), 60);
        assert!(state.answered_numbers().is_empty());
        assert!(state.marked_numbers().is_empty());
    }

    #[test]
    fn set_duration_applies_to_next_session_only() {
        let mut store = SessionStore::new(SessionConfig { total_minutes: 1 });
        store.initialize(quiz()).unwrap();
        store.set_duration(5).unwrap();
        // Running session keeps its countdown.
        assert_eq!(store.state().unwrap().remaining_seconds(), 60);

        store.initialize(quiz()).unwrap();
        assert_eq!(store.state().unwrap().remaining_seconds(), 300);
    }

    #[test]
    fn set_duration_rejects_zero() {
        let mut store = SessionStore::new(SessionConfig::default());
        assert!(matches!(
            store.set_duration(0),
            Err(ExamError::InvalidDuration(0))
        ));
        assert_eq!(store.config().total_minutes, 20);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut store = SessionStore::new(SessionConfig { total_minutes: 1 });
        store.initialize(quiz()).unwrap();

        store.finish(40);
        store.finish(55);

        let state = store.state().unwrap();
        assert_eq!(state.phase(), Phase::Finished);
        assert_eq!(state.elapsed_seconds(), Some(40));
    }

    #[test]
    fn reset_clears_state_but_keeps_duration() {
        let mut store = SessionStore::new(SessionConfig { total_minutes: 7 });
        store.initialize(quiz()).unwrap();
        store.reset();
        assert!(store.state().is_none());
        assert_eq!(store.config().total_minutes, 7);
    }

    #[test]
    fn answered_predicate_requires_non_empty_selection() {
        let mut store = SessionStore::new(SessionConfig::default());
        store.initialize(quiz()).unwrap();

        let state = store.state_mut().unwrap();
        state.answers.insert(1, BTreeSet::new());
        assert!(!state.is_answered(1));
        assert!(state.answered_numbers().is_empty());

        state.answers.get_mut(&1).unwrap().insert("A".into());
        assert!(state.is_answered(1));
        assert_eq!(state.answered_numbers(), vec![1]);
    }
}
