use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use super::countdown::Countdown;
use crate::error::QuizError;
use crate::types::{OptionDescriptor, Question, SessionEvent, SessionStatus, SessionSummary};

/// What a single countdown tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No countdown was running.
    Idle,
    /// Seconds left after this tick.
    Running(u32),
    /// Time ran out and the cursor moved to this index.
    Advanced(usize),
    /// Time ran out on the last question.
    Exhausted,
}

impl Tick {
    pub fn is_expired(self) -> bool {
        matches!(self, Tick::Advanced(_) | Tick::Exhausted)
    }
}

/// The quiz attempt itself. Reads are public; transitions go through
/// [`QuizSession`](super::QuizSession) so the countdown task stays in step.
#[derive(Debug)]
pub struct SessionState {
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    time_per_question: u32,
    time_remaining: u32,
    user_answers: Vec<Option<String>>,
    credited: Vec<bool>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    status: SessionStatus,
    auto_end: bool,
    pub(crate) countdown: Countdown,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionState {
    pub(crate) fn new(
        questions: Vec<Question>,
        time_per_question: u32,
        auto_end: bool,
        events: broadcast::Sender<SessionEvent>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::configuration("a quiz needs at least one question"));
        }
        if time_per_question == 0 {
            return Err(QuizError::configuration(
                "time per question must be at least one second",
            ));
        }

        let count = questions.len();
        Ok(Self {
            questions,
            current_index: 0,
            score: 0,
            time_per_question,
            time_remaining: time_per_question,
            user_answers: vec![None; count],
            credited: vec![false; count],
            started_at: None,
            ended_at: None,
            status: SessionStatus::NotStarted,
            auto_end,
            countdown: Countdown::default(),
            events,
        })
    }

    pub(crate) fn start(&mut self) -> Result<(), QuizError> {
        self.require(SessionStatus::NotStarted, "start the quiz")?;
        self.status = SessionStatus::InProgress;
        self.started_at = Some(Utc::now());
        self.arm_countdown();
        log::info!(
            "Quiz started with {} questions, {}s each",
            self.questions.len(),
            self.time_per_question
        );
        self.emit(SessionEvent::Started);
        Ok(())
    }

    /// Records the answer for the current question and scores it. Only the
    /// last answer given for a question counts toward the score.
    pub(crate) fn submit_answer(&mut self, answer: &str) -> Result<bool, QuizError> {
        self.require(SessionStatus::InProgress, "submit an answer")?;

        let index = self.current_index;
        let question = &self.questions[index];
        let correct = question.check_answer(answer);
        let points = question.points();

        if self.credited[index] {
            self.score -= points;
        }
        if correct {
            self.score += points;
        }
        self.credited[index] = correct;
        self.user_answers[index] = Some(answer.to_string());

        log::debug!("Answer {:?} for question {} correct: {}", answer, index, correct);
        Ok(correct)
    }

    /// Stops the countdown, then moves forward if there is a next question.
    /// On the last question the countdown stays stopped.
    pub(crate) fn next_question(&mut self) -> Result<bool, QuizError> {
        self.require(SessionStatus::InProgress, "move to the next question")?;
        self.countdown.cancel();
        Ok(self.advance())
    }

    pub(crate) fn previous_question(&mut self) -> Result<bool, QuizError> {
        self.require(SessionStatus::InProgress, "move to the previous question")?;
        self.countdown.cancel();
        if self.current_index == 0 {
            return Ok(false);
        }
        self.current_index -= 1;
        self.arm_countdown();
        Ok(true)
    }

    /// Freezes the clock. Calling it again once ended changes nothing.
    pub(crate) fn end(&mut self) -> Result<(), QuizError> {
        match self.status {
            SessionStatus::Ended => Ok(()),
            SessionStatus::NotStarted => Err(QuizError::InvalidState {
                operation: "end the quiz",
                status: self.status,
            }),
            SessionStatus::InProgress => {
                self.finish();
                Ok(())
            }
        }
    }

    /// One second of the countdown. Never fails: outside a running countdown
    /// this does nothing.
    pub(crate) fn tick(&mut self) -> Tick {
        if self.status != SessionStatus::InProgress || !self.countdown.is_armed() {
            return Tick::Idle;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            self.emit(SessionEvent::Tick {
                index: self.current_index,
                remaining: self.time_remaining,
            });
            return Tick::Running(self.time_remaining);
        }

        let expired = self.current_index;
        self.countdown.cancel();
        let advanced = self.advance();
        log::info!("Time ran out on question {}", expired);
        self.emit(SessionEvent::Expired {
            index: expired,
            advanced,
        });

        if advanced {
            Tick::Advanced(self.current_index)
        } else {
            if self.auto_end {
                self.finish();
            }
            Tick::Exhausted
        }
    }

    fn advance(&mut self) -> bool {
        if self.current_index + 1 >= self.questions.len() {
            return false;
        }
        self.current_index += 1;
        self.arm_countdown();
        true
    }

    fn arm_countdown(&mut self) {
        self.countdown.arm();
        self.time_remaining = self.time_per_question;
    }

    fn finish(&mut self) {
        self.countdown.cancel();
        self.status = SessionStatus::Ended;
        self.ended_at = Some(Utc::now());
        log::info!(
            "Quiz ended: {}/{} points in {}",
            self.score,
            self.total_points(),
            self.format_time_spent()
        );
        self.emit(SessionEvent::Ended {
            score: self.score,
            total_points: self.total_points(),
        });
    }

    fn require(&self, expected: SessionStatus, operation: &'static str) -> Result<(), QuizError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(QuizError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }

    fn emit(&self, event: SessionEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn current_question_index(&self) -> usize {
        self.current_index
    }

    pub fn option_descriptors(&self) -> Vec<OptionDescriptor> {
        self.current_question().option_descriptors()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(Question::points).sum()
    }

    pub fn time_per_question(&self) -> u32 {
        self.time_per_question
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn user_answers(&self) -> &[Option<String>] {
        &self.user_answers
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.user_answers[self.current_index].as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Whole seconds between start and end (or now, while running).
    pub fn time_spent(&self) -> u64 {
        let Some(started) = self.started_at else {
            return 0;
        };
        let end = self.ended_at.unwrap_or_else(Utc::now);
        end.signed_duration_since(started).num_seconds().max(0) as u64
    }

    pub fn format_time_spent(&self) -> String {
        let total = self.time_spent();
        format!("{:02}:{:02}", total / 60, total % 60)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            total_points: self.total_points(),
            answered: self.user_answers.iter().filter(|a| a.is_some()).count(),
            question_count: self.questions.len(),
            time_spent: self.time_spent(),
            formatted_time: self.format_time_spent(),
        }
    }
}
