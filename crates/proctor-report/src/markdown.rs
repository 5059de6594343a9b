//! Markdown report generator.

use std::path::Path;

use anyhow::{Context, Result};

use proctor_core::report::ExamReport;

/// Format an exam report as markdown.
pub fn to_markdown(report: &ExamReport) -> String {
    let mut md = String::new();

    md.push_str("# Exam Results\n\n");
    if let Some(source) = &report.quiz.source {
        md.push_str(&format!("Quiz: `{source}`\n\n"));
    }
    md.push_str(&format!(
        "**Score:** {}/{} ({}%) | **Time taken:** {}\n\n",
        report.correct_count,
        report.total,
        report.percentage,
        report.elapsed_clock()
    ));

    md.push_str("## Answer Summary\n\n");
    md.push_str("| # | Question | Result | Your Answer | Correct Answer |\n");
    md.push_str("|---|----------|--------|-------------|----------------|\n");
    for outcome in &report.outcomes {
        let result = if outcome.is_correct {
            "correct"
        } else {
            "incorrect"
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            outcome.number,
            outcome.text.replace('|', "\\|"),
            result,
            outcome.selected_text(),
            outcome.correct_text(),
        ));
    }

    md
}

/// Write a markdown report to a file.
pub fn write_markdown_report(report: &ExamReport, path: &Path) -> Result<()> {
    let md = to_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)
        .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_report;

    #[test]
    fn summary_line_and_table() {
        let md = to_markdown(&sample_report());
        assert!(md.contains("**Score:** 1/2 (50%)"));
        assert!(md.contains("**Time taken:** 00:20"));
        assert!(md.contains("| 2 | Pick the <primes> | incorrect | No Answer | B, C |"));
    }

    #[test]
    fn pipes_in_question_text_are_escaped() {
        let mut report = sample_report();
        report.outcomes[0].text = "a | b".into();
        let md = to_markdown(&report);
        assert!(md.contains("a \\| b"));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_markdown_report(&sample_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Exam Results"));
    }
}
