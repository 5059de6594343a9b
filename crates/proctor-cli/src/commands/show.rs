//! The `proctor show` command.

use std::path::PathBuf;

use anyhow::Result;

use proctor_core::report::ExamReport;

pub fn execute(report_path: PathBuf) -> Result<()> {
    let report = ExamReport::load_json(&report_path)?;
    print_report(&report);
    Ok(())
}

/// Render a scored report to stdout: summary table, then the
/// per-question breakdown.
pub fn print_report(report: &ExamReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Score", "Percentage", "Correct", "Incorrect", "Time Taken"]);
    table.add_row(vec![
        Cell::new(format!("{}/{}", report.correct_count, report.total)),
        Cell::new(format!("{}%", report.percentage)),
        Cell::new(report.correct_count),
        Cell::new(report.incorrect_count),
        Cell::new(report.elapsed_clock()),
    ]);
    println!("{table}");

    println!("\nAnswer Summary");
    for (position, outcome) in report.outcomes.iter().enumerate() {
        let verdict = if outcome.is_correct { "OK" } else { "X" };
        println!("  {}. [{}] {}", position + 1, verdict, outcome.text);
        println!("       Your answer: {}", outcome.selected_text());
        if !outcome.is_correct {
            println!("       Correct answer: {}", outcome.correct_text());
        }
    }
}
