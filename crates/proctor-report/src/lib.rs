//! proctor-report — Markdown and HTML renderers for exam reports.

pub mod html;
pub mod markdown;

#[cfg(test)]
pub(crate) mod test_fixtures {
    use chrono::Utc;
    use uuid::Uuid;

    use proctor_core::report::{ExamReport, QuestionOutcome, QuizSummary};

    pub fn sample_report() -> ExamReport {
        ExamReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            quiz: QuizSummary {
                source: Some("sample.json".into()),
                question_count: 2,
            },
            correct_count: 1,
            incorrect_count: 1,
            total: 2,
            percentage: 50,
            elapsed_seconds: 20,
            outcomes: vec![
                QuestionOutcome {
                    number: 1,
                    text: "What is 2 + 2?".into(),
                    is_correct: true,
                    selected: vec!["A".into()],
                    correct: vec!["A".into()],
                },
                QuestionOutcome {
                    number: 2,
                    text: "Pick the <primes>".into(),
                    is_correct: false,
                    selected: vec![],
                    correct: vec!["B".into(), "C".into()],
                },
            ],
        }
    }
}
