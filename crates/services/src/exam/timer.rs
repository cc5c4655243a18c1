use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use exam_core::model::TickOutcome;

use super::service::ExamSession;
use super::view::ExamOutcome;

/// An exam session shared between the UI task and its ticker.
pub type SharedExamSession = Arc<Mutex<ExamSession>>;

const TICK: Duration = Duration::from_secs(1);

//
// ─── TICKER ────────────────────────────────────────────────────────────────────
//

/// The countdown task for one active attempt.
///
/// Ticks the shared session once per elapsed second of wall-clock time.
/// The phase is re-checked under the lock on every tick (inside
/// [`ExamSession::tick`]), so a tick that races a pause, submission, or
/// restart is absorbed rather than applied; the loop then exits
/// permanently. Re-entering `Active` (resume, restart) is handled by
/// spawning a fresh ticker, never by reviving this one.
///
/// Dropping the ticker aborts the pending tick, which covers component
/// teardown; [`ExamTicker::stop`] does the same explicitly so a caller
/// can void the pending tick before installing new state.
pub struct ExamTicker {
    handle: JoinHandle<()>,
}

impl ExamTicker {
    /// Spawns the ticking task.
    ///
    /// `on_expire` runs at most once, with the final outcome, when a tick
    /// consumes the last second of the budget — the automatic-submission
    /// hook. It is not called for manual submission or cancellation.
    pub fn spawn<F>(session: SharedExamSession, on_expire: F) -> Self
    where
        F: FnOnce(ExamOutcome) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut on_expire = Some(on_expire);
            loop {
                tokio::time::sleep(TICK).await;
                let (outcome, result) = {
                    let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
                    let outcome = guard.tick();
                    let result = if outcome == TickOutcome::Expired {
                        guard.outcome()
                    } else {
                        None
                    };
                    (outcome, result)
                };
                match outcome {
                    TickOutcome::Ticked => {}
                    TickOutcome::Expired => {
                        tracing::debug!("exam time budget expired; auto-submitting");
                        if let (Some(hook), Some(result)) = (on_expire.take(), result) {
                            hook(result);
                        }
                        break;
                    }
                    // The session left Active between ticks; this ticker
                    // is stale and must never fire again.
                    TickOutcome::Ignored => break,
                }
            }
        });
        Self { handle }
    }

    /// Voids the pending tick immediately.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// True once the ticking task has exited (expired, went stale, or was
    /// stopped).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ExamTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
