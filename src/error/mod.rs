use std::fmt;

use crate::types::SessionStatus;

#[derive(Debug)]
pub enum QuizError {
    /// A command was issued in a lifecycle state that does not accept it.
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },
    /// Malformed question data or settings, rejected before a session exists.
    Configuration(String),
    CsvError(csv::Error),
}

impl QuizError {
    pub fn configuration(message: impl Into<String>) -> Self {
        QuizError::Configuration(message.into())
    }
}

impl std::error::Error for QuizError {}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::InvalidState { operation, status } => {
                write!(f, "Cannot {} while the quiz is {}", operation, status)
            }
            QuizError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            QuizError::CsvError(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl From<csv::Error> for QuizError {
    fn from(err: csv::Error) -> Self {
        QuizError::CsvError(err)
    }
}
