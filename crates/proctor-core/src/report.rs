//! Exam report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timefmt::format_clock;

/// A complete scored exam report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the quiz that was taken.
    pub quiz: QuizSummary,
    /// Questions answered correctly.
    pub correct_count: usize,
    /// Questions answered incorrectly or not at all.
    pub incorrect_count: usize,
    /// Total number of questions.
    pub total: usize,
    /// Correct share rounded to the nearest whole percent.
    pub percentage: u32,
    /// Time taken in seconds.
    pub elapsed_seconds: u32,
    /// Per-question outcomes, in quiz order.
    pub outcomes: Vec<QuestionOutcome>,
}

/// Summary of a quiz (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    #[serde(default)]
    pub source: Option<String>,
    pub question_count: usize,
}

/// The outcome of a single question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// Stable question number.
    pub number: u32,
    /// Question text.
    pub text: String,
    /// Whether the selection matched the correct set exactly.
    pub is_correct: bool,
    /// The user's selection in canonical (sorted) order. Empty means
    /// the question was left unanswered.
    pub selected: Vec<String>,
    /// The correct keys in canonical (sorted) order.
    pub correct: Vec<String>,
}

impl QuestionOutcome {
    /// Display text for the user's answer. An empty selection renders
    /// as "No Answer", never as an empty list.
    pub fn selected_text(&self) -> String {
        if self.selected.is_empty() {
            "No Answer".to_string()
        } else {
            self.selected.join(", ")
        }
    }

    /// Display text for the correct answer.
    pub fn correct_text(&self) -> String {
        self.correct.join(", ")
    }
}

impl ExamReport {
    /// Time taken, formatted as MM:SS.
    pub fn elapsed_clock(&self) -> String {
        format_clock(self.elapsed_seconds)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ExamReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report() -> ExamReport {
        ExamReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            quiz: QuizSummary {
                source: Some("test.json".into()),
                question_count: 2,
            },
            correct_count: 1,
            incorrect_count: 1,
            total: 2,
            percentage: 50,
            elapsed_seconds: 95,
            outcomes: vec![
                QuestionOutcome {
                    number: 1,
                    text: "first".into(),
                    is_correct: true,
                    selected: vec!["A".into()],
                    correct: vec!["A".into()],
                },
                QuestionOutcome {
                    number: 2,
                    text: "second".into(),
                    is_correct: false,
                    selected: vec![],
                    correct: vec!["A".into(), "C".into()],
                },
            ],
        }
    }

    #[test]
    fn no_answer_display() {
        let report = make_report();
        assert_eq!(report.outcomes[0].selected_text(), "A");
        assert_eq!(report.outcomes[1].selected_text(), "No Answer");
        assert_eq!(report.outcomes[1].correct_text(), "A, C");
    }

    #[test]
    fn elapsed_clock_format() {
        assert_eq!(make_report().elapsed_clock(), "01:35");
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = ExamReport::load_json(&path).unwrap();

        assert_eq!(loaded.total, 2);
        assert_eq!(loaded.percentage, 50);
        assert_eq!(loaded.outcomes.len(), 2);
        assert_eq!(loaded.quiz.source.as_deref(), Some("test.json"));
    }
}
