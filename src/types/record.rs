use serde::Deserialize;

use crate::error::QuizError;
use crate::types::{label_index, Question, OPTION_LABELS};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    MultipleChoice,
    TrueFalse,
}

/// One row of the question bank CSV.
#[derive(Debug, Deserialize, Clone)]
pub struct QuestionRecord {
    pub id: u32,
    pub kind: RecordKind,
    pub question: String,
    pub correct_answer: String,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub option4: Option<String>,
    pub points: Option<u32>,
}

impl QuestionRecord {
    pub fn get_options(&self) -> Vec<String> {
        [&self.option1, &self.option2, &self.option3, &self.option4]
            .into_iter()
            .flatten()
            .map(|option| option.trim().to_string())
            .filter(|option| !option.is_empty())
            .collect()
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuizError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let points = record.points.unwrap_or(1);
        let answer = record.correct_answer.trim();

        match record.kind {
            RecordKind::MultipleChoice => {
                let options = record.get_options();
                // Banks may name the right option by its text instead of its label
                let label = match label_index(answer) {
                    Some(_) => answer.to_string(),
                    None => options
                        .iter()
                        .position(|option| option == answer)
                        .and_then(|index| OPTION_LABELS.get(index))
                        .map(|label| label.to_string())
                        .unwrap_or_else(|| answer.to_string()),
                };
                Question::multiple_choice(record.id, record.question, options, &label, points)
            }
            RecordKind::TrueFalse => {
                let correct = if answer.eq_ignore_ascii_case("true") {
                    true
                } else if answer.eq_ignore_ascii_case("false") {
                    false
                } else {
                    return Err(QuizError::configuration(format!(
                        "question {}: true/false answer must be true or false, got {:?}",
                        record.id, answer
                    )));
                };
                Question::true_false(record.id, record.question, correct, points)
            }
        }
    }
}
