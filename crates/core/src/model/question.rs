use thiserror::Error;

use crate::model::ids::QuestionId;

/// Bounds on the number of answer options, matching the content schema.
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must have between {MIN_OPTIONS} and {MAX_OPTIONS} options, got {got}")]
    OptionCountOutOfRange { got: usize },

    #[error("correct answer index {index} is out of range for {options} options")]
    CorrectAnswerOutOfRange { index: usize, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Immutable once loaded.
///
/// The option order is significant: `correct_answer` is a 0-based index
/// into `options`, and the review screen renders options in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: Option<String>,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is blank,
    /// `QuestionError::OptionCountOutOfRange` if there are fewer than
    /// [`MIN_OPTIONS`] or more than [`MAX_OPTIONS`] options, and
    /// `QuestionError::CorrectAnswerOutOfRange` if `correct_answer` does
    /// not index into `options`.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < MIN_OPTIONS || options.len() > MAX_OPTIONS {
            return Err(QuestionError::OptionCountOutOfRange { got: options.len() });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
            explanation,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// 0-based index of the correct option.
    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
