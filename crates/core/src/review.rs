use std::collections::BTreeMap;

use crate::model::{Question, Quiz};

//
// ─── CLASSIFICATION ────────────────────────────────────────────────────────────
//

/// Correctness classification of one question within a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    /// The selected option equals the question's correct option.
    Correct,
    /// An option was selected but it is not the correct one.
    Incorrect,
    /// No option was ever selected for this question.
    Skipped,
}

/// Classifies a single question given the selected option, if any.
#[must_use]
pub fn classify(question: &Question, selected: Option<usize>) -> AnswerStatus {
    match selected {
        None => AnswerStatus::Skipped,
        Some(option) if option == question.correct_answer() => AnswerStatus::Correct,
        Some(_) => AnswerStatus::Incorrect,
    }
}

//
// ─── REVIEW SHEET ──────────────────────────────────────────────────────────────
//

/// Everything the review screen needs for one question: what was
/// selected, what was right, and the resulting classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub index: usize,
    pub selected: Option<usize>,
    pub correct_answer: usize,
    pub status: AnswerStatus,
}

/// Derives the per-question review sheet for an attempt's answer set.
///
/// Read-only and recomputable at any time: the derivation depends only on
/// the quiz and the (frozen) answers, never on navigation state, and it
/// never mutates either. One entry per question, in quiz order.
#[must_use]
pub fn review_sheet(quiz: &Quiz, answers: &BTreeMap<usize, usize>) -> Vec<ReviewEntry> {
    quiz.questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = answers.get(&index).copied();
            ReviewEntry {
                index,
                selected,
                correct_answer: question.correct_answer(),
                status: classify(question, selected),
            }
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
