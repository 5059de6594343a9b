//! The exam session state machine.
//!
//! `ExamEngine` drives one session: answer capture, review marking,
//! navigation, and the countdown-driven auto-submit. Every mutation is a
//! synchronous transition method; the async `drive` loop serializes the
//! once-per-second timer against user commands so the two can never
//! interleave, which removes the classic "user clicks Finish while the
//! timer fires zero" race by construction.

use std::cmp::Ordering;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::error::ExamError;
use crate::model::{Question, QuestionKind, Quiz};
use crate::report::ExamReport;
use crate::scoring::score;
use crate::session::{Phase, SessionState, SessionStore};

/// Direction of the most recent navigation, for presentation transitions.
/// Deterministic: the sign of the index delta, with no movement for a
/// jump to the current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavDirection {
    Forward,
    Backward,
    #[default]
    Unchanged,
}

/// A mutation request sent into the serialized session loop. `Select`
/// and `ToggleMark` apply to the current question.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Select (or toggle, for multi-choice) an option on the current
    /// question.
    Select { key: String },
    /// Toggle the review mark on the current question.
    ToggleMark,
    /// Jump to a question by navigation index.
    Jump { index: usize },
    /// Advance to the next question, if any.
    Next,
    /// Finish the exam. `confirmed` is false while an "end test"
    /// confirmation is still pending.
    RequestFinish { confirmed: bool },
}

/// Read-only projection of the live session for presentation layers.
#[derive(Debug)]
pub struct SessionView<'a> {
    /// The question at the current navigation index.
    pub question: &'a Question,
    /// Current navigation index (0-based).
    pub index: usize,
    /// Total question count.
    pub total: usize,
    /// Seconds left on the countdown.
    pub remaining_seconds: u32,
    /// Sorted selection for the current question.
    pub selected: Vec<String>,
    /// Whether the current question is marked for review.
    pub is_marked: bool,
    /// Question numbers with a non-empty selection.
    pub answered: Vec<u32>,
    /// Question numbers marked for review.
    pub marked: Vec<u32>,
    /// Direction of the last navigation.
    pub direction: NavDirection,
}

/// Callbacks fired from inside the session loop.
pub trait SessionObserver {
    fn on_tick(&mut self, _remaining_seconds: u32) {}
    fn on_view(&mut self, _view: &SessionView<'_>) {}
    fn on_finished(&mut self, _report: &ExamReport) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// The interactive state machine for one exam session.
pub struct ExamEngine {
    store: SessionStore,
    direction: NavDirection,
}

impl ExamEngine {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            direction: NavDirection::Unchanged,
        }
    }

    /// Start a fresh session over a validated quiz, discarding any
    /// previous answers and marks.
    pub fn start(&mut self, quiz: Quiz) -> Result<(), ExamError> {
        self.direction = NavDirection::Unchanged;
        self.store.initialize(quiz)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    /// The active session state, if a quiz has been started.
    pub fn state(&self) -> Option<&SessionState> {
        self.store.state()
    }

    fn in_progress(&self) -> bool {
        self.state().is_some_and(|s| s.phase() == Phase::InProgress)
    }

    /// Select an option on a question.
    ///
    /// Single-choice questions use radio semantics: the selection becomes
    /// exactly `{key}`, and re-selecting the chosen option keeps it.
    /// Multi-choice questions toggle membership. A no-op once finished.
    pub fn select_option(&mut self, number: u32, key: &str) -> Result<(), ExamError> {
        if !self.in_progress() {
            return Ok(());
        }
        let state = self
            .store
            .state_mut()
            .expect("in_progress implies active state");

        // Validate before touching the answer map so a failed call
        // leaves state unchanged.
        let question = state
            .quiz
            .by_number(number)
            .ok_or(ExamError::UnknownQuestion(number))?;
        if !question.has_option(key) {
            return Err(ExamError::UnknownOption {
                number,
                key: key.to_string(),
            });
        }
        let kind = question.kind();

        let selection = state.answers.entry(number).or_default();
        match kind {
            QuestionKind::Single => {
                selection.clear();
                selection.insert(key.to_string());
            }
            QuestionKind::Multi => {
                if !selection.remove(key) {
                    selection.insert(key.to_string());
                }
            }
        }
        Ok(())
    }

    /// Toggle the review mark on a question. Independent of answers.
    pub fn toggle_mark(&mut self, number: u32) -> Result<(), ExamError> {
        if !self.in_progress() {
            return Ok(());
        }
        let state = self
            .store
            .state_mut()
            .expect("in_progress implies active state");
        if state.quiz.by_number(number).is_none() {
            return Err(ExamError::UnknownQuestion(number));
        }
        if !state.marked.remove(&number) {
            state.marked.insert(number);
        }
        Ok(())
    }

    /// Jump to a navigation index. Out-of-range targets fail loudly and
    /// leave state unchanged.
    pub fn jump(&mut self, index: usize) -> Result<(), ExamError> {
        let Some(state) = self.store.state_mut() else {
            return Err(ExamError::IndexOutOfRange { index, len: 0 });
        };
        let len = state.quiz.len();
        if index >= len {
            return Err(ExamError::IndexOutOfRange { index, len });
        }
        if state.phase == Phase::Finished {
            return Ok(());
        }
        self.direction = match index.cmp(&state.current_index) {
            Ordering::Greater => NavDirection::Forward,
            Ordering::Less => NavDirection::Backward,
            Ordering::Equal => NavDirection::Unchanged,
        };
        state.current_index = index;
        Ok(())
    }

    /// Advance one question. A defined no-op at the last index.
    pub fn next(&mut self) {
        let Some(state) = self.store.state() else {
            return;
        };
        let at_last = state.current_index + 1 >= state.quiz.len();
        if !at_last {
            let target = state.current_index() + 1;
            // Target is validated above, so this cannot fail.
            let _ = self.jump(target);
        }
    }

    /// Finish the exam and score it.
    ///
    /// `confirmed` is false when an explicit "end test" action is still
    /// awaiting confirmation; nothing happens in that case. The first
    /// finish wins: a second call (timeout racing a manual click) is a
    /// no-op returning `None`.
    pub fn request_finish(&mut self, confirmed: bool) -> Option<ExamReport> {
        if !confirmed || !self.in_progress() {
            return None;
        }
        let state = self.store.state()?;
        let elapsed = state.total_seconds() - state.remaining_seconds();
        self.finish_with(elapsed)
    }

    /// One countdown tick. Decrements the remaining time and, on hitting
    /// zero, auto-submits with the full configured duration as the time
    /// taken (deliberate policy: timeout never reports tick drift).
    /// Stale ticks after finish are no-ops.
    pub fn tick(&mut self) -> Option<ExamReport> {
        if !self.in_progress() {
            return None;
        }
        let state = self.store.state_mut()?;
        state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
        if state.remaining_seconds == 0 {
            let elapsed = state.total_seconds();
            tracing::info!("time expired, auto-submitting");
            return self.finish_with(elapsed);
        }
        None
    }

    fn finish_with(&mut self, elapsed_seconds: u32) -> Option<ExamReport> {
        self.store.finish(elapsed_seconds);
        let state = self.store.state()?;
        Some(score(&state.quiz, &state.answers, elapsed_seconds))
    }

    /// Question numbers whose selection is non-empty. Recomputed on
    /// demand, never stored.
    pub fn answered_question_numbers(&self) -> Vec<u32> {
        self.state()
            .map(|s| s.answered_numbers())
            .unwrap_or_default()
    }

    /// The question at the current navigation index.
    pub fn current_question(&self) -> Option<&Question> {
        let state = self.state()?;
        state.quiz.question(state.current_index())
    }

    /// Snapshot of everything a presentation layer needs.
    pub fn view(&self) -> Option<SessionView<'_>> {
        let state = self.state()?;
        let question = state.quiz.question(state.current_index())?;
        Some(SessionView {
            question,
            index: state.current_index(),
            total: state.quiz.len(),
            remaining_seconds: state.remaining_seconds(),
            selected: state.selection(question.number),
            is_marked: state.is_marked(question.number),
            answered: state.answered_numbers(),
            marked: state.marked_numbers(),
            direction: self.direction,
        })
    }

    fn apply(&mut self, command: EngineCommand) -> Result<Option<ExamReport>, ExamError> {
        match command {
            EngineCommand::Select { key } => {
                let number = self
                    .current_question()
                    .map(|q| q.number)
                    .ok_or(ExamError::EmptyQuiz)?;
                self.select_option(number, &key)?;
                Ok(None)
            }
            EngineCommand::ToggleMark => {
                let number = self
                    .current_question()
                    .map(|q| q.number)
                    .ok_or(ExamError::EmptyQuiz)?;
                self.toggle_mark(number)?;
                Ok(None)
            }
            EngineCommand::Jump { index } => {
                self.jump(index)?;
                Ok(None)
            }
            EngineCommand::Next => {
                self.next();
                Ok(None)
            }
            EngineCommand::RequestFinish { confirmed } => Ok(self.request_finish(confirmed)),
        }
    }

    /// Run the session to completion.
    ///
    /// Ticks and commands are folded into one `select!` loop, so the
    /// engine's transition function is effectively single-threaded no
    /// matter where the inputs originate. The interval lives inside this
    /// call: returning at finish drops it, which is what guarantees the
    /// timer stops once the session leaves `InProgress`. A closed command
    /// channel ends the test with whatever has been answered.
    pub async fn drive<O: SessionObserver>(
        &mut self,
        mut commands: mpsc::Receiver<EngineCommand>,
        observer: &mut O,
    ) -> Result<ExamReport> {
        anyhow::ensure!(self.state().is_some(), "no active session to drive");

        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first tick of a tokio interval completes immediately;
        // consume it so the countdown starts a full second out.
        interval.tick().await;

        if let Some(view) = self.view() {
            observer.on_view(&view);
        }

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(report) = self.tick() {
                        observer.on_finished(&report);
                        return Ok(report);
                    }
                    if let Some(state) = self.state() {
                        observer.on_tick(state.remaining_seconds());
                    }
                }
                command = commands.recv() => {
                    let command = command
                        .unwrap_or(EngineCommand::RequestFinish { confirmed: true });
                    if let Some(report) = self.apply(command)? {
                        observer.on_finished(&report);
                        return Ok(report);
                    }
                    if let Some(view) = self.view() {
                        observer.on_view(&view);
                    }
                }
            }
        }
    }
}
