use std::sync::{Arc, Mutex, PoisonError};

use exam_core::Clock;
use exam_core::model::{Phase, QuizId};

use crate::content::QuizSource;
use crate::error::ExamError;
use crate::identity::IdentityProvider;
use crate::stats::{StatsSink, UserStat};

use super::service::ExamSession;
use super::timer::{ExamTicker, SharedExamSession};
use super::view::ExamOutcome;

// Stage and subject are not yet derived from the course context the quiz
// was opened from; the record carries these fixed values meanwhile.
// TODO: wire stage/subject from the owning course once the subject
// taxonomy for stats is settled.
const STAT_STAGE: &str = "PPL";
const STAT_SUBJECT: &str = "Air Law";

//
// ─── FLOW SERVICE ──────────────────────────────────────────────────────────────
//

/// Orchestrates exam sittings against the external collaborators.
///
/// Owns the time source and the boundary handles (content, identity,
/// stats); the rendering layer goes through [`ActiveExam`] and never
/// touches a collaborator directly.
#[derive(Clone)]
pub struct ExamFlowService {
    clock: Clock,
    quizzes: Arc<dyn QuizSource>,
    identity: Arc<dyn IdentityProvider>,
    stats: Arc<dyn StatsSink>,
}

impl ExamFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizSource>,
        identity: Arc<dyn IdentityProvider>,
        stats: Arc<dyn StatsSink>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            identity,
            stats,
        }
    }

    /// Fetches the quiz and starts a ticking exam sitting over it.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::QuizNotFound` when the source has no such
    /// quiz and `ExamError::Content` when the stored content is
    /// malformed or unreachable.
    pub async fn start_exam(&self, id: &QuizId) -> Result<ActiveExam, ExamError> {
        let quiz = self
            .quizzes
            .fetch_quiz(id)
            .await?
            .ok_or_else(|| ExamError::QuizNotFound(id.clone()))?;

        let session: SharedExamSession = Arc::new(Mutex::new(ExamSession::new(quiz)));
        let ticker = self.start_ticker(&session);
        Ok(ActiveExam {
            flow: self.clone(),
            session,
            ticker: Some(ticker),
        })
    }

    fn start_ticker(&self, session: &SharedExamSession) -> ExamTicker {
        let flow = self.clone();
        ExamTicker::spawn(Arc::clone(session), move |outcome| {
            flow.record_completion(outcome.score);
        })
    }

    /// Emits the one-shot completion record, fire-and-forget.
    ///
    /// Delivery failure is logged and dropped: the result is already
    /// final and locally known, so nothing blocks and nothing retries.
    fn record_completion(&self, score: f64) {
        let Some(user_id) = self.identity.current_user() else {
            tracing::warn!("no signed-in user at exam completion; skipping stat record");
            return;
        };
        let stat = UserStat {
            user_id,
            stage: STAT_STAGE.to_string(),
            subject: STAT_SUBJECT.to_string(),
            date: self.clock.now(),
            score,
        };
        let sink = Arc::clone(&self.stats);
        tokio::spawn(async move {
            if let Err(error) = sink.record(&stat).await {
                tracing::warn!(%error, "failed to deliver exam stat");
            }
        });
    }
}

//
// ─── ACTIVE EXAM ───────────────────────────────────────────────────────────────
//

/// One running exam sitting: the shared session plus its ticker, owned
/// together so every phase exit also voids the pending tick — the
/// cancellation cannot be forgotten independently of the transition.
///
/// The method set mirrors the discrete user actions of the exam screen;
/// each runs synchronously under the session lock.
pub struct ActiveExam {
    flow: ExamFlowService,
    session: SharedExamSession,
    ticker: Option<ExamTicker>,
}

impl std::fmt::Debug for ActiveExam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveExam")
            .field("ticker_active", &self.ticker.is_some())
            .finish_non_exhaustive()
    }
}

impl ActiveExam {
    /// Reads from the session under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&ExamSession) -> R) -> R {
        let guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut ExamSession) -> R) -> R {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn void_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    /// Final result data, once the attempt has completed.
    #[must_use]
    pub fn outcome(&self) -> Option<ExamOutcome> {
        self.read(ExamSession::outcome)
    }

    pub fn select_answer(&self, option: usize) {
        self.with_mut(|session| session.select_answer(option));
    }

    pub fn next_question(&self) {
        self.with_mut(ExamSession::next_question);
    }

    pub fn jump_to(&self, index: usize) {
        self.with_mut(|session| session.jump_to(index));
    }

    /// Pauses or resumes. The pending tick is voided before the phase
    /// changes; resuming arms a fresh ticker from the frozen value.
    pub fn toggle_pause(&mut self) {
        self.void_ticker();
        let phase = self.with_mut(|session| {
            session.toggle_pause();
            session.attempt().phase()
        });
        if phase == Phase::Active {
            self.ticker = Some(self.flow.start_ticker(&self.session));
        }
    }

    /// Manually submits the exam.
    ///
    /// If this call completes the attempt, the completion record is
    /// emitted exactly once, fire-and-forget. Returns the final outcome,
    /// or `None` when the attempt is paused (nothing happens then).
    pub fn submit(&mut self) -> Option<ExamOutcome> {
        self.void_ticker();
        let (transitioned, outcome) =
            self.with_mut(|session| (session.submit(), session.outcome()));
        if transitioned {
            if let Some(outcome) = outcome {
                self.flow.record_completion(outcome.score);
            }
        }
        outcome
    }

    /// Discards the attempt and starts over with the full time budget.
    ///
    /// The old ticker is cancelled before the attempt is reset, so a tick
    /// intended for the previous attempt can never land on the fresh one.
    pub fn restart(&mut self) {
        self.void_ticker();
        self.with_mut(ExamSession::restart);
        self.ticker = Some(self.flow.start_ticker(&self.session));
    }

    pub fn enter_review(&self) {
        self.with_mut(ExamSession::enter_review);
    }

    pub fn review_previous(&self) {
        self.with_mut(ExamSession::review_previous);
    }

    pub fn review_next(&self) {
        self.with_mut(ExamSession::review_next);
    }

    pub fn review_jump(&self, index: usize) {
        self.with_mut(|session| session.review_jump(index));
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
