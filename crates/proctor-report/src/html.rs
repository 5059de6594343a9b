//! HTML report generator.
//!
//! Produces a self-contained HTML results page with all CSS inlined.

use std::path::Path;

use anyhow::{Context, Result};

use proctor_core::report::ExamReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML results page from an exam report.
pub fn generate_html(report: &ExamReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Exam Results</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Score card
    html.push_str("<section class=\"score-card\">\n");
    html.push_str(&format!(
        "<div class=\"score\"><span>{}</span> / {}</div>\n",
        report.correct_count, report.total
    ));
    html.push_str(&format!(
        "<p class=\"score-details\">You got {} out of {} questions correct.</p>\n",
        report.correct_count, report.total
    ));

    html.push_str("<div class=\"stats-grid\">\n");
    html.push_str(&format!(
        "<div><span class=\"stat-value\">{}%</span><span class=\"stat-label\">Percentage</span></div>\n",
        report.percentage
    ));
    html.push_str(&format!(
        "<div><span class=\"stat-value\">{}</span><span class=\"stat-label\">Time Taken</span></div>\n",
        report.elapsed_clock()
    ));
    html.push_str(&format!(
        "<div><span class=\"stat-value correct\">{}</span><span class=\"stat-label\">Correct</span></div>\n",
        report.correct_count
    ));
    html.push_str(&format!(
        "<div><span class=\"stat-value incorrect\">{}</span><span class=\"stat-label\">Incorrect</span></div>\n",
        report.incorrect_count
    ));
    html.push_str("</div>\n</section>\n");

    // Answer summary
    html.push_str("<section class=\"summary\">\n<h2>Answer Summary</h2>\n");
    for (position, outcome) in report.outcomes.iter().enumerate() {
        let class = if outcome.is_correct {
            "correct"
        } else {
            "incorrect"
        };
        html.push_str("<div class=\"result-item\">\n");
        html.push_str(&format!(
            "<p class=\"question\">{}. {}</p>\n",
            position + 1,
            html_escape(&outcome.text)
        ));
        html.push_str(&format!(
            "<p class=\"answer {}\">Your Answer: {}</p>\n",
            class,
            html_escape(&outcome.selected_text())
        ));
        if !outcome.is_correct {
            html.push_str(&format!(
                "<p class=\"correct-answer\">Correct Answer: {}</p>\n",
                html_escape(&outcome.correct_text())
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");

    html.push_str(&format!(
        "<footer>Generated {}</footer>\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</body>\n</html>\n");

    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ExamReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; color: #1f2430; }
.score-card { text-align: center; padding: 2rem; border: 1px solid #e0e3ea; border-radius: 12px; }
.score { font-size: 3rem; font-weight: 700; }
.score span { color: #2f6fed; }
.score-details { color: #6b7280; }
.stats-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; margin-top: 1.5rem; }
.stat-value { display: block; font-size: 1.4rem; font-weight: 600; }
.stat-label { display: block; font-size: 0.8rem; color: #6b7280; }
.stat-value.correct, .answer.correct { color: #16a34a; }
.stat-value.incorrect, .answer.incorrect { color: #dc2626; }
.summary { margin-top: 2rem; }
.result-item { border-bottom: 1px solid #e0e3ea; padding: 0.75rem 0; }
.question { font-weight: 600; margin-bottom: 0.25rem; }
.answer, .correct-answer { margin: 0.1rem 0; }
.correct-answer { color: #16a34a; }
footer { margin-top: 2rem; font-size: 0.8rem; color: #9ca3af; text-align: center; }
"#;
