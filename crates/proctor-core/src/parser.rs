//! JSON quiz parser.
//!
//! Loads quizzes from JSON files and directories, and validates them. The
//! expected format is a non-empty array of objects with `question_number`,
//! `question`, an order-preserving `options` map, and an `answer` array of
//! correct option keys.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{AnswerOption, Question, Quiz};

/// Intermediate JSON structure for parsing quiz files.
///
/// `options` deserializes into a `serde_json::Map`, which keeps insertion
/// order (the `preserve_order` feature); that order becomes display order.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    question_number: u32,
    question: String,
    options: serde_json::Map<String, serde_json::Value>,
    answer: Vec<String>,
}

/// Parse a single JSON file into a `Quiz`.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a JSON string into a `Quiz` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let raw: Vec<RawQuestion> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse quiz JSON: {}", source_path.display()))?;

    if raw.is_empty() {
        anyhow::bail!(
            "{}: expected a non-empty array of questions",
            source_path.display()
        );
    }

    let mut seen_numbers = HashSet::new();
    let mut questions = Vec::with_capacity(raw.len());

    for rq in raw {
        let number = rq.question_number;
        if number == 0 {
            anyhow::bail!("question_number must be positive");
        }
        if !seen_numbers.insert(number) {
            anyhow::bail!("duplicate question_number: {number}");
        }
        if rq.options.is_empty() {
            anyhow::bail!("question {number} has no options");
        }
        if rq.answer.is_empty() {
            anyhow::bail!("question {number} has an empty answer list");
        }

        let mut options = Vec::with_capacity(rq.options.len());
        for (key, value) in rq.options {
            let label = value
                .as_str()
                .map(|s| s.to_string())
                .with_context(|| format!("question {number}: option '{key}' is not a string"))?;
            options.push(AnswerOption { key, label });
        }

        // serde_json maps cannot hold duplicate keys, but answers can
        // repeat or point at nothing; reject both.
        let mut seen_answers = HashSet::new();
        for key in &rq.answer {
            if !options.iter().any(|o| &o.key == key) {
                anyhow::bail!("question {number}: answer key '{key}' is not an option");
            }
            if !seen_answers.insert(key.clone()) {
                anyhow::bail!("question {number}: duplicate answer key '{key}'");
            }
        }

        questions.push(Question {
            number,
            text: rq.question,
            options,
            correct: rq.answer,
        });
    }

    Ok(Quiz {
        source: Some(source_path.display().to_string()),
        questions,
    })
}

/// Recursively load all `.json` quiz files from a directory.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in
        std::fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question number (if applicable).
    pub question_number: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for issues that are legal but probably mistakes.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for q in &quiz.questions {
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_number: Some(q.number),
                message: "question text is empty".into(),
            });
        }

        for opt in &q.options {
            if opt.label.trim().is_empty() {
                warnings.push(ValidationWarning {
                    question_number: Some(q.number),
                    message: format!("option '{}' has a blank label", opt.key),
                });
            }
        }

        if q.options.len() == 1 {
            warnings.push(ValidationWarning {
                question_number: Some(q.number),
                message: "question has only one option".into(),
            });
        }

        if q.correct.len() == q.options.len() && q.options.len() > 1 {
            warnings.push(ValidationWarning {
                question_number: Some(q.number),
                message: "every option is marked correct".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;
    use std::path::PathBuf;

    const VALID_JSON: &str = r#"[
        {
            "question_number": 1,
            "question": "Which keyword declares an immutable binding?",
            "options": {"A": "let", "B": "mut", "C": "static"},
            "answer": ["A"]
        },
        {
            "question_number": 2,
            "question": "Which of these are smart pointers?",
            "options": {"A": "Box", "B": "i32", "C": "Rc"},
            "answer": ["A", "C"]
        }
    ]"#;

    fn src() -> PathBuf {
        PathBuf::from("test.json")
    }

    #[test]
    fn parse_valid_quiz() {
        let quiz = parse_quiz_str(VALID_JSON, &src()).unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.questions[0].number, 1);
        assert_eq!(quiz.questions[0].kind(), QuestionKind::Single);
        assert_eq!(quiz.questions[1].kind(), QuestionKind::Multi);
        assert_eq!(quiz.source.as_deref(), Some("test.json"));
    }

    #[test]
    fn options_keep_file_order() {
        let json = r#"[{
            "question_number": 1,
            "question": "q",
            "options": {"C": "third", "A": "first", "B": "second"},
            "answer": ["A"]
        }]"#;
        let quiz = parse_quiz_str(json, &src()).unwrap();
        let keys: Vec<&str> = quiz.questions[0]
            .options
            .iter()
            .map(|o| o.key.as_str())
            .collect();
        assert_eq!(keys, vec!["C", "A", "B"]);
    }

    #[test]
    fn reject_empty_array() {
        let err = parse_quiz_str("[]", &src()).unwrap_err();
        assert!(err.to_string().contains("non-empty array"));
    }

    #[test]
    fn reject_non_array() {
        assert!(parse_quiz_str(r#"{"question_number": 1}"#, &src()).is_err());
        assert!(parse_quiz_str("not json at all", &src()).is_err());
    }

    #[test]
    fn reject_empty_answer() {
        let json = r#"[{
            "question_number": 1,
            "question": "q",
            "options": {"A": "x"},
            "answer": []
        }]"#;
        let err = parse_quiz_str(json, &src()).unwrap_err();
        assert!(err.to_string().contains("empty answer"));
    }

    #[test]
    fn reject_answer_not_in_options() {
        let json = r#"[{
            "question_number": 1,
            "question": "q",
            "options": {"A": "x", "B": "y"},
            "answer": ["D"]
        }]"#;
        let err = parse_quiz_str(json, &src()).unwrap_err();
        assert!(err.to_string().contains("'D'"));
    }

    #[test]
    fn reject_duplicate_question_numbers() {
        let json = r#"[
            {"question_number": 1, "question": "q1", "options": {"A": "x"}, "answer": ["A"]},
            {"question_number": 1, "question": "q2", "options": {"A": "x"}, "answer": ["A"]}
        ]"#;
        let err = parse_quiz_str(json, &src()).unwrap_err();
        assert!(err.to_string().contains("duplicate question_number"));
    }

    #[test]
    fn reject_zero_question_number() {
        let json = r#"[{
            "question_number": 0,
            "question": "q",
            "options": {"A": "x"},
            "answer": ["A"]
        }]"#;
        assert!(parse_quiz_str(json, &src()).is_err());
    }

    #[test]
    fn validate_flags_suspicious_questions() {
        let json = r#"[
            {"question_number": 1, "question": "  ", "options": {"A": "x", "B": "y"}, "answer": ["A", "B"]},
            {"question_number": 2, "question": "ok", "options": {"A": "x"}, "answer": ["A"]}
        ]"#;
        let quiz = parse_quiz_str(json, &src()).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("text is empty")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("every option is marked correct")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("only one option")));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quiz.json"), VALID_JSON).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let quizzes = load_quiz_directory(dir.path()).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].len(), 2);
    }
}
