use std::collections::BTreeMap;

use crate::model::quiz::Quiz;

/// Wall-clock budget for one attempt, in seconds (60 minutes).
pub const EXAM_TIME_LIMIT_SECS: u32 = 60 * 60;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse state of an attempt. `Active` is initial, `Completed` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Paused,
    Completed,
}

/// What a single timer tick did to the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The attempt was not `Active`; nothing changed.
    Ignored,
    /// One second was consumed and time remains.
    Ticked,
    /// The tick consumed the last second; the attempt is now `Completed`
    /// via timeout. Reported exactly once so the caller can run the
    /// one-shot completion side effect.
    Expired,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One user's pass through a quiz: answers, position, time budget, phase.
///
/// All transitions are synchronous and absorb illegal triggers as silent
/// no-ops (answering after completion, advancing past the last question,
/// review navigation before completion). The only callers that need to
/// observe a transition are the timer and the submit path, which get it
/// from [`Attempt::tick`] and [`Attempt::submit`] return values.
///
/// Invariants held after every operation:
/// - `current_index` stays within `[0, question_count)`.
/// - `remaining_seconds` only decreases, and only while `Active`.
/// - `Completed` is terminal: answers and the clock are frozen; only
///   review navigation and the `reviewing` flag may still change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    question_count: usize,
    answers: BTreeMap<usize, usize>,
    current_index: usize,
    remaining_seconds: u32,
    phase: Phase,
    completed_via_timeout: bool,
    reviewing: bool,
    time_taken_seconds: Option<u32>,
}

impl Attempt {
    /// Creates a fresh attempt for the given quiz: no answers, first
    /// question, full time budget, `Active`.
    ///
    /// Taking the quiz (rather than a bare count) ties the attempt to a
    /// validated question set, so `question_count` is always at least one.
    #[must_use]
    pub fn new(quiz: &Quiz) -> Self {
        Self::fresh(quiz.question_count())
    }

    fn fresh(question_count: usize) -> Self {
        Self {
            question_count,
            answers: BTreeMap::new(),
            current_index: 0,
            remaining_seconds: EXAM_TIME_LIMIT_SECS,
            phase: Phase::Active,
            completed_via_timeout: false,
            reviewing: false,
            time_taken_seconds: None,
        }
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Sparse answer map: question index to selected option index.
    /// An absent entry means the question is unanswered.
    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// True iff the attempt completed because the time budget ran out,
    /// as opposed to a manual submission. Fixed at completion time.
    #[must_use]
    pub fn completed_via_timeout(&self) -> bool {
        self.completed_via_timeout
    }

    #[must_use]
    pub fn is_reviewing(&self) -> bool {
        self.reviewing
    }

    /// Seconds spent on the attempt. `None` until completed; the full
    /// budget on timeout, budget minus remaining on manual submission.
    #[must_use]
    pub fn time_taken_seconds(&self) -> Option<u32> {
        self.time_taken_seconds
    }

    // ─── Active-phase transitions ──────────────────────────────────────────

    /// Records `option` as the answer for the current question,
    /// overwriting any prior selection. No-op unless `Active`.
    ///
    /// The option index is not range-checked here; the session layer
    /// validates it against the current question before delegating.
    pub fn select_answer(&mut self, option: usize) {
        if self.phase != Phase::Active {
            return;
        }
        self.answers.insert(self.current_index, option);
    }

    /// Moves to the next question. No-op when not `Active` or already on
    /// the last question (the last question exits via submission only).
    pub fn advance(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        if self.current_index + 1 < self.question_count {
            self.current_index += 1;
        }
    }

    /// Jumps to any valid question index via the navigation strip,
    /// answered or not. No-op when not `Active` or out of range.
    pub fn jump_to(&mut self, index: usize) {
        if self.phase != Phase::Active {
            return;
        }
        if index < self.question_count {
            self.current_index = index;
        }
    }

    /// Toggles between `Active` and `Paused`. Pausing freezes the
    /// countdown without resetting it. No-op once `Completed`.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Active => Phase::Paused,
            Phase::Paused => Phase::Active,
            Phase::Completed => return,
        };
    }

    /// Consumes one second of the time budget.
    ///
    /// Only an `Active` attempt ticks; reaching zero is the sole trigger
    /// of the automatic completion, which records the full budget as the
    /// time taken. The remaining time is never observable below zero.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Active {
            return TickOutcome::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = Phase::Completed;
            self.completed_via_timeout = true;
            self.time_taken_seconds = Some(EXAM_TIME_LIMIT_SECS);
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked
        }
    }

    /// Manually submits the exam, completing the attempt.
    ///
    /// Returns `true` iff this call performed the `Active` to `Completed`
    /// transition, so the caller can run the one-shot completion side
    /// effect. A paused or already-completed attempt is left unchanged.
    pub fn submit(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.phase = Phase::Completed;
        self.completed_via_timeout = false;
        self.time_taken_seconds = Some(EXAM_TIME_LIMIT_SECS - self.remaining_seconds);
        true
    }

    // ─── Review-mode transitions ───────────────────────────────────────────

    /// Enters review mode, resetting the position to the first question
    /// regardless of where the exam ended. No-op before completion.
    pub fn enter_review(&mut self) {
        if self.phase != Phase::Completed {
            return;
        }
        self.reviewing = true;
        self.current_index = 0;
    }

    /// Review navigation: one question back, saturating at the first
    /// question (never wraps). No-op outside review mode.
    pub fn review_previous(&mut self) {
        if !self.in_review() {
            return;
        }
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Review navigation: one question forward, saturating at the last
    /// question. No-op outside review mode.
    pub fn review_next(&mut self) {
        if !self.in_review() {
            return;
        }
        if self.current_index + 1 < self.question_count {
            self.current_index += 1;
        }
    }

    /// Unrestricted index change via the review strip. No-op outside
    /// review mode or for an out-of-range index.
    pub fn review_jump(&mut self, index: usize) {
        if !self.in_review() {
            return;
        }
        if index < self.question_count {
            self.current_index = index;
        }
    }

    fn in_review(&self) -> bool {
        self.phase == Phase::Completed && self.reviewing
    }

    // ─── Restart ───────────────────────────────────────────────────────────

    /// Discards the attempt entirely and starts over: answers cleared,
    /// first question, full time budget, `Active`. Nothing carries over.
    pub fn restart(&mut self) {
        *self = Self::fresh(self.question_count);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::{QuestionId, QuizId};
    use crate::model::question::Question;

    fn build_quiz(question_count: usize) -> Quiz {
        let questions = (0..question_count)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    format!("Question {i}"),
                    vec!["A".into(), "B".into(), "C".into()],
                    0,
                    None,
                )
                .unwrap()
            })
            .collect();
        Quiz::new(QuizId::new("quiz-1"), "Test Quiz", questions).unwrap()
    }

    fn completed_attempt(question_count: usize) -> Attempt {
        let mut attempt = Attempt::new(&build_quiz(question_count));
        assert!(attempt.submit());
        attempt
    }

    #[test]
    fn fresh_attempt_defaults() {
        let attempt = Attempt::new(&build_quiz(3));

        assert_eq!(attempt.phase(), Phase::Active);
        assert_eq!(attempt.current_index(), 0);
        assert_eq!(attempt.remaining_seconds(), EXAM_TIME_LIMIT_SECS);
        assert!(attempt.answers().is_empty());
        assert!(!attempt.completed_via_timeout());
        assert!(!attempt.is_reviewing());
        assert_eq!(attempt.time_taken_seconds(), None);
    }

    #[test]
    fn selecting_again_overwrites_prior_answer() {
        let mut attempt = Attempt::new(&build_quiz(2));

        attempt.select_answer(1);
        attempt.select_answer(2);

        assert_eq!(attempt.answer(0), Some(2));
        assert_eq!(attempt.answered_count(), 1);
    }

    #[test]
    fn answers_are_frozen_outside_active() {
        let mut attempt = Attempt::new(&build_quiz(2));
        attempt.toggle_pause();
        attempt.select_answer(1);
        assert_eq!(attempt.answer(0), None);

        let mut attempt = completed_attempt(2);
        attempt.select_answer(1);
        assert_eq!(attempt.answer(0), None);
    }

    #[test]
    fn advance_stops_on_last_question() {
        let mut attempt = Attempt::new(&build_quiz(3));

        attempt.advance();
        attempt.advance();
        assert_eq!(attempt.current_index(), 2);

        // Next on the last question is disallowed; submit is the only exit.
        attempt.advance();
        assert_eq!(attempt.current_index(), 2);
    }

    #[test]
    fn jump_is_unrestricted_within_range() {
        let mut attempt = Attempt::new(&build_quiz(5));

        attempt.jump_to(4);
        assert_eq!(attempt.current_index(), 4);
        attempt.jump_to(1);
        assert_eq!(attempt.current_index(), 1);

        attempt.jump_to(5);
        assert_eq!(attempt.current_index(), 1);
    }

    #[test]
    fn pause_freezes_the_countdown() {
        let mut attempt = Attempt::new(&build_quiz(2));
        assert_eq!(attempt.tick(), TickOutcome::Ticked);
        let frozen = attempt.remaining_seconds();

        attempt.toggle_pause();
        assert_eq!(attempt.phase(), Phase::Paused);
        assert_eq!(attempt.tick(), TickOutcome::Ignored);
        assert_eq!(attempt.remaining_seconds(), frozen);

        attempt.toggle_pause();
        assert_eq!(attempt.phase(), Phase::Active);
        assert_eq!(attempt.tick(), TickOutcome::Ticked);
        assert_eq!(attempt.remaining_seconds(), frozen - 1);
    }

    #[test]
    fn ticks_are_ignored_after_completion() {
        let mut attempt = completed_attempt(2);
        let frozen = attempt.remaining_seconds();

        assert_eq!(attempt.tick(), TickOutcome::Ignored);
        assert_eq!(attempt.remaining_seconds(), frozen);
    }

    #[test]
    fn timeout_completes_with_full_time_taken() {
        let mut attempt = Attempt::new(&build_quiz(2));

        for _ in 0..EXAM_TIME_LIMIT_SECS - 1 {
            assert_eq!(attempt.tick(), TickOutcome::Ticked);
        }
        assert_eq!(attempt.remaining_seconds(), 1);

        assert_eq!(attempt.tick(), TickOutcome::Expired);
        assert_eq!(attempt.phase(), Phase::Completed);
        assert!(attempt.completed_via_timeout());
        assert_eq!(attempt.time_taken_seconds(), Some(EXAM_TIME_LIMIT_SECS));
        assert_eq!(attempt.remaining_seconds(), 0);

        // Expiry fires exactly once.
        assert_eq!(attempt.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn manual_submit_records_elapsed_time() {
        let mut attempt = Attempt::new(&build_quiz(2));
        for _ in 0..100 {
            attempt.tick();
        }

        assert!(attempt.submit());
        assert_eq!(attempt.phase(), Phase::Completed);
        assert!(!attempt.completed_via_timeout());
        assert_eq!(attempt.time_taken_seconds(), Some(100));
    }

    #[test]
    fn submit_is_a_transition_only_once() {
        let mut attempt = Attempt::new(&build_quiz(2));
        assert!(attempt.submit());
        assert!(!attempt.submit());
    }

    #[test]
    fn submit_requires_active_phase() {
        let mut attempt = Attempt::new(&build_quiz(2));
        attempt.toggle_pause();

        assert!(!attempt.submit());
        assert_eq!(attempt.phase(), Phase::Paused);
    }

    #[test]
    fn pause_toggle_is_ignored_after_completion() {
        let mut attempt = completed_attempt(2);
        attempt.toggle_pause();
        assert_eq!(attempt.phase(), Phase::Completed);
    }

    #[test]
    fn entering_review_resets_position() {
        let mut attempt = Attempt::new(&build_quiz(4));
        attempt.jump_to(3);
        assert!(attempt.submit());

        attempt.enter_review();
        assert!(attempt.is_reviewing());
        assert_eq!(attempt.current_index(), 0);
        assert_eq!(attempt.phase(), Phase::Completed);
    }

    #[test]
    fn review_navigation_requires_completion() {
        let mut attempt = Attempt::new(&build_quiz(3));
        attempt.enter_review();
        assert!(!attempt.is_reviewing());

        attempt.review_next();
        assert_eq!(attempt.current_index(), 0);
    }

    #[test]
    fn review_previous_saturates_at_first_question() {
        let mut attempt = completed_attempt(3);
        attempt.enter_review();

        attempt.review_previous();
        assert_eq!(attempt.current_index(), 0);
    }

    #[test]
    fn review_next_saturates_at_last_question() {
        let mut attempt = completed_attempt(3);
        attempt.enter_review();

        attempt.review_next();
        attempt.review_next();
        attempt.review_next();
        assert_eq!(attempt.current_index(), 2);
    }

    #[test]
    fn review_jump_is_unrestricted() {
        let mut attempt = completed_attempt(5);
        attempt.enter_review();

        attempt.review_jump(4);
        assert_eq!(attempt.current_index(), 4);
        attempt.review_jump(9);
        assert_eq!(attempt.current_index(), 4);
    }

    #[test]
    fn restart_matches_a_fresh_attempt() {
        let quiz = build_quiz(3);
        let mut attempt = Attempt::new(&quiz);
        attempt.select_answer(2);
        attempt.advance();
        for _ in 0..50 {
            attempt.tick();
        }
        assert!(attempt.submit());
        attempt.enter_review();

        attempt.restart();
        assert_eq!(attempt, Attempt::new(&quiz));
    }

    #[test]
    fn current_index_stays_in_bounds_across_operations() {
        let quiz = build_quiz(3);
        let mut attempt = Attempt::new(&quiz);

        for _ in 0..5 {
            attempt.advance();
            assert!(attempt.current_index() < quiz.question_count());
        }
        attempt.jump_to(99);
        assert!(attempt.current_index() < quiz.question_count());

        assert!(attempt.submit());
        attempt.enter_review();
        for _ in 0..5 {
            attempt.review_next();
            assert!(attempt.current_index() < quiz.question_count());
        }
        attempt.review_previous();
        assert!(attempt.current_index() < quiz.question_count());
    }
}
