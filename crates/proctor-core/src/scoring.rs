//! Scoring: turn final answers plus the question list into a graded report.
//!
//! Correctness is set equality between the user's selection and the
//! question's correct keys, compared as canonical sorted sequences so the
//! order options were clicked in (or listed in the file) never matters.
//! An empty selection is always incorrect.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use uuid::Uuid;

use crate::model::Quiz;
use crate::report::{ExamReport, QuestionOutcome, QuizSummary};

/// Score a finished session.
pub fn score(
    quiz: &Quiz,
    answers: &BTreeMap<u32, BTreeSet<String>>,
    elapsed_seconds: u32,
) -> ExamReport {
    let mut outcomes = Vec::with_capacity(quiz.len());
    let mut correct_count = 0usize;

    for question in &quiz.questions {
        let correct = question.correct_keys_sorted();
        let selected: Vec<String> = answers
            .get(&question.number)
            .map(|sel| sel.iter().cloned().collect())
            .unwrap_or_default();

        // BTreeSet iteration is already sorted, so `selected` is canonical.
        let is_correct = !selected.is_empty() && selected == correct;
        if is_correct {
            correct_count += 1;
        }

        outcomes.push(QuestionOutcome {
            number: question.number,
            text: question.text.clone(),
            is_correct,
            selected,
            correct,
        });
    }

    let total = quiz.len();
    let percentage = if total == 0 {
        0
    } else {
        (correct_count as f64 / total as f64 * 100.0).round() as u32
    };

    ExamReport {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        quiz: QuizSummary {
            source: quiz.source.clone(),
            question_count: total,
        },
        correct_count,
        incorrect_count: total - correct_count,
        total,
        percentage,
        elapsed_seconds,
        outcomes,
    }
}
