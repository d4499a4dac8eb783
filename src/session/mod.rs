use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, MutexGuard};

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::types::{Question, SessionEvent};

mod countdown;
mod state;
pub use state::{SessionState, Tick};

/// Default seconds allowed per question.
pub const DEFAULT_TIME_PER_QUESTION: u32 = 30;

const EVENT_CAPACITY: usize = 64;

/// Shared handle to one quiz attempt.
///
/// The handle owns the per-question countdown: every navigation command cancels
/// the running countdown, and starts a fresh one if the current question changed.
#[derive(Clone)]
pub struct QuizSession {
    inner: Arc<Mutex<SessionState>>,
    events: broadcast::Sender<SessionEvent>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, time_per_question: u32) -> Result<Self, QuizError> {
        Self::build(questions, time_per_question, false)
    }

    pub fn from_config(questions: Vec<Question>, config: &QuizConfig) -> Result<Self, QuizError> {
        Self::build(questions, config.time_per_question, config.auto_end)
    }

    fn build(
        questions: Vec<Question>,
        time_per_question: u32,
        auto_end: bool,
    ) -> Result<Self, QuizError> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = SessionState::new(questions, time_per_question, auto_end, events.clone())?;
        Ok(Self {
            inner: Arc::new(Mutex::new(state)),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Read access for queries. Hold it briefly: the countdown waits on the same lock.
    pub async fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().await
    }

    pub async fn start(&self) -> Result<(), QuizError> {
        let mut state = self.inner.lock().await;
        state.start()?;
        countdown::drive(&self.inner, &mut state);
        Ok(())
    }

    pub async fn submit_answer(&self, answer: &str) -> Result<bool, QuizError> {
        self.inner.lock().await.submit_answer(answer)
    }

    pub async fn next_question(&self) -> Result<bool, QuizError> {
        let mut state = self.inner.lock().await;
        let moved = state.next_question()?;
        countdown::drive(&self.inner, &mut state);
        Ok(moved)
    }

    pub async fn previous_question(&self) -> Result<bool, QuizError> {
        let mut state = self.inner.lock().await;
        let moved = state.previous_question()?;
        countdown::drive(&self.inner, &mut state);
        Ok(moved)
    }

    pub async fn end(&self) -> Result<(), QuizError> {
        self.inner.lock().await.end()
    }

    /// True when both handles point at the same attempt.
    pub fn same_session(&self, other: &QuizSession) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
