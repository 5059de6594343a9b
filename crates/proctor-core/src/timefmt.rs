//! Countdown and elapsed-time formatting shared by the CLI and reports.

/// Remaining seconds at which the countdown display switches to its
/// low-time emphasis.
pub const LOW_TIME_THRESHOLD_SECS: u32 = 30;

/// Format a second count as zero-padded `MM:SS`. Minutes are not capped
/// at two digits for long exams.
pub fn format_clock(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{mins:02}:{secs:02}")
}
