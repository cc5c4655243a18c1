use thiserror::Error;

use crate::model::QuestionError;
use crate::model::QuizError;

/// Malformed-content errors raised while constructing the domain model.
///
/// These are load-time precondition violations: a session must refuse to
/// start against content that fails here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
