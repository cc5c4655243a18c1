//! Presentation-agnostic values for the completed screen.
//!
//! No pre-formatted prose and no styling assumptions; the rendering layer
//! decides how to show these.

/// Final result of a completed attempt, for the score banner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExamOutcome {
    /// Percentage score in `[0, 100]`.
    pub score: f64,
    /// Whether the score meets the display passing threshold.
    pub passed: bool,
    /// Seconds spent: the full budget on timeout, elapsed time otherwise.
    pub time_taken_seconds: u32,
    /// True when the time budget expired before a manual submission.
    pub via_timeout: bool,
}

/// Formats a second count as a zero-padded `MM:SS` clock.
///
/// Minutes are not capped at 59: a full hour renders as `60:00`, matching
/// the exam's 60-minute budget display.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{minutes:02}:{secs:02}")
}
