mod attempt;
mod ids;
mod question;
mod quiz;

pub use attempt::{Attempt, EXAM_TIME_LIMIT_SECS, Phase, TickOutcome};
pub use ids::{QuestionId, QuizId, UserId};
pub use question::{MAX_OPTIONS, MIN_OPTIONS, Question, QuestionError};
pub use quiz::{Quiz, QuizError};
