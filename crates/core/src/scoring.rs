use std::collections::BTreeMap;

use crate::model::Quiz;

/// Score (in percent) a display layer annotates as the passing mark.
///
/// Display-only: it gates no transition and no persistence — an attempt
/// below the threshold still completes and is recorded normally.
pub const PASSING_SCORE: f64 = 60.0;

/// Percentage of correctly answered questions, in `[0, 100]`.
///
/// Unanswered questions count as incorrect, and the divisor is the total
/// question count — an attempt with unanswered questions cannot reach
/// 100%. Deterministic and side-effect free; invoked both for the final
/// score at completion and for the completed-screen banner.
///
/// # Examples
///
/// ```
/// # use exam_core::model::{Attempt, Question, QuestionId, Quiz, QuizId};
/// # use exam_core::scoring::score_percent;
/// let questions = vec![
///     Question::new(QuestionId::new("q1"), "1 + 1?", vec!["1".into(), "2".into()], 1, None)?,
///     Question::new(QuestionId::new("q2"), "2 + 2?", vec!["4".into(), "5".into()], 0, None)?,
/// ];
/// let quiz = Quiz::new(QuizId::new("quiz"), "Arithmetic", questions)?;
///
/// let mut attempt = Attempt::new(&quiz);
/// attempt.select_answer(1);
/// assert_eq!(score_percent(&quiz, attempt.answers()), 50.0);
/// # Ok::<(), exam_core::Error>(())
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_percent(quiz: &Quiz, answers: &BTreeMap<usize, usize>) -> f64 {
    let correct = quiz
        .questions()
        .iter()
        .enumerate()
        .filter(|(index, question)| answers.get(index) == Some(&question.correct_answer()))
        .count();
    (correct as f64 / quiz.question_count() as f64) * 100.0
}

/// Whether a score meets [`PASSING_SCORE`].
#[must_use]
pub fn is_passing(score: f64) -> bool {
    score >= PASSING_SCORE
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
