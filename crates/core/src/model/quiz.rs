use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz must contain at least one question")]
    NoQuestions,
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered set of questions. Immutable once loaded.
///
/// Question order defines numbering and navigation order for an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    questions: Vec<Question>,
}

impl Quiz {
    /// Builds a validated quiz.
    ///
    /// A quiz with no questions is refused here so a session can never
    /// start against one (the score divisor is the question count).
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle` if the title is blank and
    /// `QuizError::NoQuestions` if `questions` is empty.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        Ok(Self {
            id,
            title,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Total number of questions. Always at least one.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
