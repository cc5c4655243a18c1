//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::QuizId;

/// Errors emitted by content providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error(transparent)]
    Malformed(#[from] exam_core::Error),
    #[error("content store request failed: {0}")]
    Store(String),
}

/// Errors emitted by stats sinks.
///
/// Delivery is best-effort: callers on the completion path log these and
/// move on; they never reach the user or the attempt state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error("stats endpoint is not configured")]
    Disabled,
    #[error("stats request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the exam workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamError {
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error(transparent)]
    Content(#[from] ContentError),
}
