use std::fmt;

use exam_core::model::{Attempt, EXAM_TIME_LIMIT_SECS, Question, Quiz, TickOutcome};
use exam_core::review::{self, ReviewEntry};
use exam_core::scoring;

use super::progress::ExamProgress;
use super::view::ExamOutcome;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One exam sitting: an immutable quiz plus the mutable attempt over it.
///
/// The session layer adds what the bare attempt cannot know — the
/// questions themselves. It range-checks answer selections against the
/// current question, and derives score, progress, and review data from
/// attempt snapshots. All transition rules live in [`Attempt`]; nothing
/// here bypasses them.
pub struct ExamSession {
    quiz: Quiz,
    attempt: Attempt,
}

impl ExamSession {
    /// Starts a fresh sitting of the given quiz.
    ///
    /// The quiz is valid by construction, so this cannot fail: a session
    /// never exists over empty or malformed content.
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        let attempt = Attempt::new(&quiz);
        Self { quiz, attempt }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    /// The question at the attempt's current position.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.question(self.attempt.current_index())
    }

    // ─── Active-phase operations ───────────────────────────────────────────

    /// Selects an option for the current question, overwriting any prior
    /// selection. Ignores option indices the current question does not
    /// have, and does nothing unless the attempt is active.
    pub fn select_answer(&mut self, option: usize) {
        let Some(question) = self.current_question() else {
            return;
        };
        if option < question.options().len() {
            self.attempt.select_answer(option);
        }
    }

    /// Moves to the next question; blocked on the last one.
    pub fn next_question(&mut self) {
        self.attempt.advance();
    }

    /// Jumps to any question via the navigation strip.
    pub fn jump_to(&mut self, index: usize) {
        self.attempt.jump_to(index);
    }

    /// Pauses or resumes the attempt.
    pub fn toggle_pause(&mut self) {
        self.attempt.toggle_pause();
    }

    /// Consumes one second of the time budget. See [`Attempt::tick`].
    pub fn tick(&mut self) -> TickOutcome {
        self.attempt.tick()
    }

    /// Manually submits the exam. Returns `true` iff this call completed
    /// the attempt. See [`Attempt::submit`].
    pub fn submit(&mut self) -> bool {
        self.attempt.submit()
    }

    /// Discards the attempt and starts the quiz over.
    pub fn restart(&mut self) {
        self.attempt.restart();
    }

    // ─── Review-mode operations ────────────────────────────────────────────

    pub fn enter_review(&mut self) {
        self.attempt.enter_review();
    }

    pub fn review_previous(&mut self) {
        self.attempt.review_previous();
    }

    pub fn review_next(&mut self) {
        self.attempt.review_next();
    }

    pub fn review_jump(&mut self, index: usize) {
        self.attempt.review_jump(index);
    }

    // ─── Derived values ────────────────────────────────────────────────────

    /// Current percentage score. Pure over the attempt snapshot; the same
    /// function serves the live computation at completion and the review
    /// banner.
    #[must_use]
    pub fn score(&self) -> f64 {
        scoring::score_percent(&self.quiz, self.attempt.answers())
    }

    /// Final result data, once the attempt has completed.
    #[must_use]
    pub fn outcome(&self) -> Option<ExamOutcome> {
        let time_taken_seconds = self.attempt.time_taken_seconds()?;
        let score = self.score();
        Some(ExamOutcome {
            score,
            passed: scoring::is_passing(score),
            time_taken_seconds,
            via_timeout: self.attempt.completed_via_timeout(),
        })
    }

    /// Returns a summary of the current attempt progress.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> ExamProgress {
        let total = self.quiz.question_count();
        let current_index = self.attempt.current_index();
        let remaining_seconds = self.attempt.remaining_seconds();
        let elapsed = EXAM_TIME_LIMIT_SECS - remaining_seconds;
        ExamProgress {
            total,
            answered: self.attempt.answered_count(),
            current_index,
            remaining_seconds,
            question_percent: ((current_index + 1) as f64 / total as f64) * 100.0,
            time_percent: (f64::from(elapsed) / f64::from(EXAM_TIME_LIMIT_SECS)) * 100.0,
        }
    }

    /// Per-question correctness sheet for the review strip and screen.
    #[must_use]
    pub fn review_sheet(&self) -> Vec<ReviewEntry> {
        review::review_sheet(&self.quiz, self.attempt.answers())
    }

    /// Review data for the question at the current position.
    #[must_use]
    pub fn current_review_entry(&self) -> Option<ReviewEntry> {
        let index = self.attempt.current_index();
        let question = self.quiz.question(index)?;
        let selected = self.attempt.answer(index);
        Some(ReviewEntry {
            index,
            selected,
            correct_answer: question.correct_answer(),
            status: review::classify(question, selected),
        })
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("quiz_id", &self.quiz.id())
            .field("question_count", &self.quiz.question_count())
            .field("attempt", &self.attempt)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Phase, QuestionId, QuizId};
    use exam_core::review::AnswerStatus;

    fn build_quiz(correct_answers: &[usize]) -> Quiz {
        let questions = correct_answers
            .iter()
            .enumerate()
            .map(|(i, &correct)| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    format!("Question {i}"),
                    vec!["A".into(), "B".into(), "C".into()],
                    correct,
                    None,
                )
                .unwrap()
            })
            .collect();
        Quiz::new(QuizId::new("quiz-1"), "Air Law", questions).unwrap()
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let mut session = ExamSession::new(build_quiz(&[0, 1]));

        session.select_answer(3);
        assert_eq!(session.attempt().answer(0), None);

        session.select_answer(2);
        assert_eq!(session.attempt().answer(0), Some(2));
    }

    #[test]
    fn outcome_is_absent_until_completion() {
        let mut session = ExamSession::new(build_quiz(&[1, 0]));
        assert_eq!(session.outcome(), None);

        session.select_answer(1);
        assert!(session.submit());

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.score, 50.0);
        assert!(!outcome.passed);
        assert!(!outcome.via_timeout);
        assert_eq!(outcome.time_taken_seconds, 0);
    }

    #[test]
    fn score_banner_matches_live_score() {
        let mut session = ExamSession::new(build_quiz(&[1, 0]));
        session.select_answer(1);
        session.next_question();
        session.select_answer(0);
        assert!(session.submit());

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.score, 100.0);
        assert!(outcome.passed);
        assert_eq!(outcome.score, session.score());
    }

    #[test]
    fn progress_tracks_position_and_time() {
        let mut session = ExamSession::new(build_quiz(&[0, 0, 0, 0]));
        session.next_question();
        for _ in 0..900 {
            session.tick();
        }

        let progress = session.progress();
        assert_eq!(progress.total, 4);
        assert_eq!(progress.current_index, 1);
        assert_eq!(progress.question_percent, 50.0);
        assert_eq!(progress.remaining_seconds, EXAM_TIME_LIMIT_SECS - 900);
        assert_eq!(progress.time_percent, 25.0);
    }

    #[test]
    fn review_flow_exposes_entries_per_question() {
        let mut session = ExamSession::new(build_quiz(&[1, 0, 2]));
        session.select_answer(1);
        session.next_question();
        session.select_answer(1);
        assert!(session.submit());

        session.enter_review();
        assert_eq!(session.attempt().current_index(), 0);
        assert_eq!(
            session.current_review_entry().unwrap().status,
            AnswerStatus::Correct
        );

        session.review_next();
        assert_eq!(
            session.current_review_entry().unwrap().status,
            AnswerStatus::Incorrect
        );

        session.review_next();
        assert_eq!(
            session.current_review_entry().unwrap().status,
            AnswerStatus::Skipped
        );

        let sheet = session.review_sheet();
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet[2].status, AnswerStatus::Skipped);
    }

    #[test]
    fn restart_returns_to_a_fresh_active_attempt() {
        let mut session = ExamSession::new(build_quiz(&[1, 0]));
        session.select_answer(1);
        assert!(session.submit());
        session.enter_review();

        session.restart();
        assert_eq!(session.attempt().phase(), Phase::Active);
        assert!(session.attempt().answers().is_empty());
        assert_eq!(session.attempt().remaining_seconds(), EXAM_TIME_LIMIT_SECS);
        assert!(!session.attempt().is_reviewing());
    }
}
