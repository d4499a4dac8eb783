use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::types::{ActiveQuiz, Question, QuestionRecord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::Mutex;

pub struct BotState {
    pub questions: Vec<Question>,
    pub config: QuizConfig,
    pub active_quizzes: Mutex<HashMap<i64, ActiveQuiz>>,
    pub rng: Mutex<StdRng>,
}

impl BotState {
    pub fn new(questions: Vec<Question>, config: QuizConfig) -> Self {
        Self {
            questions,
            config,
            active_quizzes: Mutex::new(HashMap::new()),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Random questions for one quiz, at most `questions_per_quiz` of them.
    pub async fn draw_questions(&self) -> Vec<Question> {
        let mut rng = self.rng.lock().await;
        let mut drawn: Vec<Question> = self
            .questions
            .choose_multiple(&mut *rng, self.config.questions_per_quiz)
            .cloned()
            .collect();
        drawn.shuffle(&mut *rng);
        drawn
    }

    pub async fn active_quiz(&self, chat_id: i64) -> Option<ActiveQuiz> {
        self.active_quizzes.lock().await.get(&chat_id).cloned()
    }
}

pub fn load_questions(path: impl AsRef<Path>) -> Result<Vec<Question>, QuizError> {
    let mut questions = Vec::new();
    let mut rdr = csv::Reader::from_path(path.as_ref())?;

    for result in rdr.deserialize() {
        let record: QuestionRecord = result?;
        questions.push(Question::try_from(record)?);
    }

    if questions.is_empty() {
        return Err(QuizError::configuration(format!(
            "no questions found in {}",
            path.as_ref().display()
        )));
    }
    Ok(questions)
}
