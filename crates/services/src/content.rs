//! Content-provider boundary.
//!
//! The engine never fetches, caches, or revalidates content itself: a
//! [`QuizSource`] hands it a fully-populated, immutable [`Quiz`] and the
//! session takes over from there. Raw content-store documents are
//! deserialized into [`QuizDoc`]/[`QuestionDoc`] and validated into the
//! domain model before a session can see them, so malformed content is
//! refused at the boundary rather than mid-exam.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use exam_core::model::{Question, QuestionId, Quiz, QuizId};

use crate::error::ContentError;

//
// ─── SOURCE TRAIT ──────────────────────────────────────────────────────────────
//

/// Read-only supplier of quiz content.
///
/// `Ok(None)` means "no quiz available yet" — a valid pre-session state,
/// not an error.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Fetch a quiz by its content-store identifier.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Malformed` when the stored document fails
    /// domain validation and `ContentError::Store` for transport
    /// failures.
    async fn fetch_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, ContentError>;
}

//
// ─── RAW DOCUMENTS ─────────────────────────────────────────────────────────────
//

/// Raw question document as stored in the content store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionDoc {
    /// Validates the raw document into a domain [`Question`].
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Malformed` when the document violates the
    /// question preconditions (blank text, option bounds, correct-answer
    /// index out of range).
    pub fn into_question(self) -> Result<Question, ContentError> {
        let question = Question::new(
            QuestionId::new(self.id),
            self.text,
            self.options,
            self.correct_answer,
            self.explanation,
        )
        .map_err(exam_core::Error::from)?;
        Ok(question)
    }
}

/// Raw quiz document as stored in the content store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub questions: Vec<QuestionDoc>,
}

impl QuizDoc {
    /// Validates the raw document into a domain [`Quiz`].
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Malformed` when the quiz is empty or any
    /// question fails validation.
    pub fn into_quiz(self) -> Result<Quiz, ContentError> {
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDoc::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        let quiz =
            Quiz::new(QuizId::new(self.id), self.title, questions).map_err(exam_core::Error::from)?;
        Ok(quiz)
    }
}

//
// ─── IN-MEMORY SOURCE ──────────────────────────────────────────────────────────
//

/// Fixed in-memory quiz catalogue for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuizSource {
    quizzes: HashMap<QuizId, Quiz>,
}

impl InMemoryQuizSource {
    #[must_use]
    pub fn new(quizzes: impl IntoIterator<Item = Quiz>) -> Self {
        Self {
            quizzes: quizzes
                .into_iter()
                .map(|quiz| (quiz.id().clone(), quiz))
                .collect(),
        }
    }
}

#[async_trait]
impl QuizSource for InMemoryQuizSource {
    async fn fetch_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, ContentError> {
        Ok(self.quizzes.get(id).cloned())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
