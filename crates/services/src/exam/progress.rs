/// Aggregated view of attempt progress, useful for UI.
///
/// Percentages are derived from the attempt snapshot on every call, never
/// stored, so the live banner and the review banner can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub current_index: usize,
    pub remaining_seconds: u32,
    /// Position through the quiz, `(current + 1) / total`, in percent.
    pub question_percent: f64,
    /// Share of the time budget already consumed, in percent.
    pub time_percent: f64,
}
