//! The `proctor take` command: run a timed exam session on the terminal.
//!
//! Stdin is parsed into engine commands by a reader task; the engine's
//! `drive` loop serializes those commands against the countdown. The
//! reader needs to know the current question to resolve option keys and
//! validate jumps, so the console observer publishes a snapshot of the
//! live view through a watch channel after every state change.

use std::path::PathBuf;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::sync::{mpsc, watch};

use proctor_core::engine::{EngineCommand, ExamEngine, SessionObserver, SessionView};
use proctor_core::model::QuestionKind;
use proctor_core::parser;
use proctor_core::report::ExamReport;
use proctor_core::session::{SessionConfig, SessionStore};
use proctor_core::timefmt::{format_clock, LOW_TIME_THRESHOLD_SECS};
use proctor_report::html::write_html_report;
use proctor_report::markdown::write_markdown_report;

use crate::commands::show::print_report;
use crate::config::load_config_from;

const HELP_TEXT: &str = "\
Commands:
  <key>        select / toggle an answer option (e.g. A)
  next, n      go to the next question
  jump N, j N  go to question N
  mark, m      toggle the review mark on this question
  list, l      show the question palette (* answered, ? marked)
  time, t      show the time remaining
  finish, f    finish the exam (last question only)
  end          end the test early (asks for confirmation)
  help, h      show this help";

/// Owned snapshot of the live view, published for the stdin reader.
///
/// `seq` increments once per applied command, so the reader can wait
/// until its previous command has actually been applied before parsing
/// the next line against the snapshot (piped input would otherwise race
/// ahead of the engine).
#[derive(Debug, Clone, Default)]
struct UiSnapshot {
    seq: u64,
    option_keys: Vec<String>,
    numbers: Vec<u32>,
    index: usize,
    total: usize,
    answered: Vec<u32>,
    marked: Vec<u32>,
    remaining_seconds: u32,
}

impl UiSnapshot {
    fn from_view(view: &SessionView<'_>, numbers: Vec<u32>, seq: u64) -> Self {
        Self {
            seq,
            option_keys: view.question.options.iter().map(|o| o.key.clone()).collect(),
            numbers,
            index: view.index,
            total: view.total,
            answered: view.answered.clone(),
            marked: view.marked.clone(),
            remaining_seconds: view.remaining_seconds,
        }
    }
}

/// Console renderer for the session.
struct ConsoleObserver {
    ui_tx: watch::Sender<UiSnapshot>,
    numbers: Vec<u32>,
    seq: u64,
    warned_low: bool,
}

impl SessionObserver for ConsoleObserver {
    fn on_view(&mut self, view: &SessionView<'_>) {
        println!();
        println!(
            "Question {} of {} | Time left: {}",
            view.index + 1,
            view.total,
            format_clock(view.remaining_seconds)
        );
        println!("{}. {}", view.question.number, view.question.text);
        if view.question.kind() == QuestionKind::Multi {
            println!("(Select all that apply)");
        }
        for option in &view.question.options {
            let marker = if view.selected.contains(&option.key) {
                "[x]"
            } else {
                "[ ]"
            };
            println!("  {} {}  {}", marker, option.key, option.label);
        }
        if view.is_marked {
            println!("  (marked for review)");
        }

        self.seq += 1;
        let _ = self
            .ui_tx
            .send(UiSnapshot::from_view(view, self.numbers.clone(), self.seq));
    }

    fn on_tick(&mut self, remaining_seconds: u32) {
        self.ui_tx
            .send_modify(|snap| snap.remaining_seconds = remaining_seconds);
        if remaining_seconds == LOW_TIME_THRESHOLD_SECS && !self.warned_low {
            self.warned_low = true;
            println!(
                "\nWarning: only {} remaining!",
                format_clock(remaining_seconds)
            );
        }
    }

    fn on_finished(&mut self, _report: &ExamReport) {
        println!("\nExam finished.");
    }
}

fn render_palette(snap: &UiSnapshot) {
    let mut parts = Vec::with_capacity(snap.numbers.len());
    for (position, number) in snap.numbers.iter().enumerate() {
        let mut cell = format!("{}", position + 1);
        if snap.answered.contains(number) {
            cell.push('*');
        }
        if snap.marked.contains(number) {
            cell.push('?');
        }
        if position == snap.index {
            cell = format!("[{cell}]");
        }
        parts.push(cell);
    }
    println!("  {}", parts.join(" "));
    println!("  * answered, ? marked for review, [ ] current");
}

/// Parse stdin lines into engine commands until EOF or the session ends.
///
/// Dropping the sender on EOF tells the engine to end the test with
/// whatever has been answered, so piped sessions terminate cleanly.
async fn read_commands(
    tx: mpsc::Sender<EngineCommand>,
    mut ui: watch::Receiver<UiSnapshot>,
    auto_confirm: bool,
) {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut awaiting_end_confirm = false;
    let mut applied_target: u64 = 1;

    while let Ok(Some(line)) = lines.next_line().await {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        // Piped input arrives faster than the engine applies commands;
        // wait until the previous command is reflected in the snapshot.
        let snap = match ui.wait_for(|s| s.seq >= applied_target).await {
            Ok(snap) => snap.clone(),
            Err(_) => return,
        };

        if awaiting_end_confirm {
            awaiting_end_confirm = false;
            if matches!(input.to_lowercase().as_str(), "y" | "yes") {
                if tx
                    .send(EngineCommand::RequestFinish { confirmed: true })
                    .await
                    .is_err()
                {
                    return;
                }
            } else {
                println!("End test cancelled.");
            }
            continue;
        }

        let lowered = input.to_lowercase();
        let command = match lowered.as_str() {
            "help" | "h" | "?" => {
                println!("{HELP_TEXT}");
                continue;
            }
            "next" | "n" => Some(EngineCommand::Next),
            "mark" | "m" => Some(EngineCommand::ToggleMark),
            "list" | "l" => {
                render_palette(&snap);
                continue;
            }
            "time" | "t" => {
                println!("Time left: {}", format_clock(snap.remaining_seconds));
                continue;
            }
            "finish" | "f" => {
                if snap.index + 1 == snap.total {
                    Some(EngineCommand::RequestFinish { confirmed: true })
                } else {
                    println!(
                        "'finish' is only available on the last question; use 'end' to stop early."
                    );
                    continue;
                }
            }
            "end" => {
                if auto_confirm {
                    Some(EngineCommand::RequestFinish { confirmed: true })
                } else {
                    println!("Are you sure you want to end the test? Type 'y' to confirm.");
                    awaiting_end_confirm = true;
                    continue;
                }
            }
            _ => {
                if let Some(rest) = lowered
                    .strip_prefix("jump ")
                    .or_else(|| lowered.strip_prefix("j "))
                {
                    match rest.trim().parse::<usize>() {
                        Ok(n) if (1..=snap.total).contains(&n) => {
                            Some(EngineCommand::Jump { index: n - 1 })
                        }
                        _ => {
                            println!("Question number must be between 1 and {}.", snap.total);
                            continue;
                        }
                    }
                } else if let Some(key) = resolve_option_key(input, &snap.option_keys) {
                    Some(EngineCommand::Select { key })
                } else {
                    println!("Unknown command '{input}'. Type 'help' for commands.");
                    continue;
                }
            }
        };

        if let Some(command) = command {
            if tx.send(command).await.is_err() {
                return;
            }
            applied_target += 1;
        }
    }
}

/// Match typed input against the current question's option keys, exact
/// first, then case-insensitive.
fn resolve_option_key(input: &str, keys: &[String]) -> Option<String> {
    if let Some(key) = keys.iter().find(|k| *k == input) {
        return Some(key.clone());
    }
    keys.iter()
        .find(|k| k.eq_ignore_ascii_case(input))
        .cloned()
}

pub async fn execute(
    quiz_path: PathBuf,
    minutes: Option<u32>,
    output: Option<PathBuf>,
    format: String,
    yes: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let minutes = minutes.unwrap_or(config.default_minutes);
    anyhow::ensure!(minutes >= 1, "test time must be at least 1 minute");
    let output = output.unwrap_or(config.output_dir);

    let quiz = parser::parse_quiz(&quiz_path)?;
    for warning in parser::validate_quiz(&quiz) {
        tracing::warn!(
            question = ?warning.question_number,
            "{}",
            warning.message
        );
    }

    let numbers: Vec<u32> = quiz.questions.iter().map(|q| q.number).collect();
    let store = SessionStore::new(SessionConfig {
        total_minutes: minutes,
    });
    let mut engine = ExamEngine::new(store);
    engine.start(quiz)?;

    eprintln!(
        "proctor — {} questions, {} minute(s). Type 'help' for commands.",
        numbers.len(),
        minutes
    );

    let (ui_tx, ui_rx) = watch::channel(UiSnapshot::default());
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    let reader = tokio::spawn(read_commands(cmd_tx, ui_rx, yes));

    let mut observer = ConsoleObserver {
        ui_tx,
        numbers,
        seq: 0,
        warned_low: false,
    };
    let report = engine.drive(cmd_rx, &mut observer).await?;
    reader.abort();

    println!();
    print_report(&report);
    save_artifacts(&report, &output, &format)?;

    Ok(())
}

fn save_artifacts(report: &ExamReport, output: &PathBuf, format: &str) -> Result<()> {
    if format == "none" {
        return Ok(());
    }

    std::fs::create_dir_all(output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown", "html"]
    } else {
        format.split(',').map(|s| s.trim()).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("report-{timestamp}.md"));
                write_markdown_report(report, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_key_resolution() {
        let keys = vec!["A".to_string(), "B".to_string()];
        assert_eq!(resolve_option_key("A", &keys), Some("A".into()));
        assert_eq!(resolve_option_key("b", &keys), Some("B".into()));
        assert_eq!(resolve_option_key("Z", &keys), None);
    }

    #[test]
    fn case_sensitive_keys_prefer_exact_match() {
        let keys = vec!["a".to_string(), "A".to_string()];
        assert_eq!(resolve_option_key("A", &keys), Some("A".into()));
        assert_eq!(resolve_option_key("a", &keys), Some("a".into()));
    }
}
