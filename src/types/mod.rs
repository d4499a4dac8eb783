use serde::Serialize;
use std::fmt;
use teloxide::types::MessageId;

use crate::session::QuizSession;

mod question;
mod record;
pub use question::*;
pub use record::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Ended,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::NotStarted => write!(f, "not started"),
            SessionStatus::InProgress => write!(f, "in progress"),
            SessionStatus::Ended => write!(f, "ended"),
        }
    }
}

/// Broadcast to subscribers of a session, mostly for clock-driven changes
/// the caller did not trigger itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Tick { index: usize, remaining: u32 },
    /// The countdown for `index` ran out. `advanced` is false on the last question.
    Expired { index: usize, advanced: bool },
    Ended { score: u32, total_points: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub score: u32,
    pub total_points: u32,
    pub answered: usize,
    pub question_count: usize,
    pub time_spent: u64,
    pub formatted_time: String,
}

/// A quiz running in one chat.
#[derive(Clone)]
pub struct ActiveQuiz {
    pub session: QuizSession,
    pub message_id: Option<MessageId>,
}
