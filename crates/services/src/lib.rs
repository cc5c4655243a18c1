#![forbid(unsafe_code)]

pub mod content;
pub mod error;
pub mod exam;
pub mod identity;
pub mod stats;

pub use exam_core::Clock;

pub use content::{InMemoryQuizSource, QuestionDoc, QuizDoc, QuizSource};
pub use error::{ContentError, ExamError, StatsError};
pub use exam::{
    ActiveExam, ExamFlowService, ExamOutcome, ExamProgress, ExamSession, ExamTicker,
    SharedExamSession, format_clock,
};
pub use identity::{AnonymousIdentity, FixedIdentity, IdentityProvider};
pub use stats::{HttpStatsSink, RecordingStatsSink, StatsConfig, StatsSink, UserStat};
