use std::path::PathBuf;
use std::time::Duration;
use std::str::FromStr;

use crate::error::QuizError;
use crate::session::DEFAULT_TIME_PER_QUESTION;

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Seconds on the clock for each question.
    pub time_per_question: u32,
    /// How many questions are drawn from the bank for one quiz.
    pub questions_per_quiz: usize,
    pub questions_file: PathBuf,
    /// End the session by itself when time runs out on the last question.
    pub auto_end: bool,
    /// A chat's quiz is ended after this long without any session event,
    /// which only happens once its countdown has stopped.
    pub idle_timeout: Duration,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            time_per_question: DEFAULT_TIME_PER_QUESTION,
            questions_per_quiz: 5,
            questions_file: PathBuf::from("questions.csv"),
            auto_end: false,
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl QuizConfig {
    pub fn from_env() -> Result<Self, QuizError> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, QuizError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let time_per_question =
            parse_var(&lookup, "QUIZ_TIME_PER_QUESTION")?.unwrap_or(defaults.time_per_question);
        if time_per_question == 0 {
            return Err(QuizError::configuration(
                "QUIZ_TIME_PER_QUESTION must be at least 1",
            ));
        }

        let questions_per_quiz =
            parse_var(&lookup, "QUIZ_QUESTIONS_PER_QUIZ")?.unwrap_or(defaults.questions_per_quiz);
        if questions_per_quiz == 0 {
            return Err(QuizError::configuration(
                "QUIZ_QUESTIONS_PER_QUIZ must be at least 1",
            ));
        }

        let questions_file = lookup("QUIZ_QUESTIONS_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.questions_file);

        let auto_end = parse_var(&lookup, "QUIZ_AUTO_END")?.unwrap_or(defaults.auto_end);

        let idle_timeout = match parse_var::<_, u64>(&lookup, "QUIZ_IDLE_TIMEOUT")? {
            Some(0) => {
                return Err(QuizError::configuration(
                    "QUIZ_IDLE_TIMEOUT must be at least 1",
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.idle_timeout,
        };

        Ok(Self {
            time_per_question,
            questions_per_quiz,
            questions_file,
            auto_end,
            idle_timeout,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, QuizError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            QuizError::configuration(format!("{} has an invalid value: {:?}", key, raw))
        }),
    }
}
