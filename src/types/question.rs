use serde::Serialize;

use crate::error::QuizError;

/// Positional prefixes shown in front of multiple choice options.
pub const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub const TRUE_TOKEN: &str = "true";
pub const FALSE_TOKEN: &str = "false";

/// One selectable choice, exported for whatever draws the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDescriptor {
    pub label: String,
    /// Token to hand back to `submit_answer` when this option is picked.
    pub value: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String>, correct: usize },
    TrueFalse { correct: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: u32,
    text: String,
    points: u32,
    kind: QuestionKind,
}

impl Question {
    /// Builds a multiple choice question. `correct_answer` is the label
    /// (`"A"`..`"D"`) of the right option.
    pub fn multiple_choice(
        id: u32,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: &str,
        points: u32,
    ) -> Result<Self, QuizError> {
        if options.len() < 2 || options.len() > OPTION_LABELS.len() {
            return Err(QuizError::configuration(format!(
                "question {} has {} options, expected 2 to {}",
                id,
                options.len(),
                OPTION_LABELS.len()
            )));
        }

        let correct = label_index(correct_answer)
            .filter(|index| *index < options.len())
            .ok_or_else(|| {
                QuizError::configuration(format!(
                    "question {}: correct answer {:?} does not name one of its options",
                    id, correct_answer
                ))
            })?;

        Self::build(id, text.into(), points, QuestionKind::MultipleChoice { options, correct })
    }

    pub fn true_false(
        id: u32,
        text: impl Into<String>,
        correct: bool,
        points: u32,
    ) -> Result<Self, QuizError> {
        Self::build(id, text.into(), points, QuestionKind::TrueFalse { correct })
    }

    fn build(id: u32, text: String, points: u32, kind: QuestionKind) -> Result<Self, QuizError> {
        if points == 0 {
            return Err(QuizError::configuration(format!(
                "question {} must be worth at least one point",
                id
            )));
        }
        Ok(Self {
            id,
            text,
            points,
            kind,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Exact comparison of an answer token against the canonical one.
    pub fn check_answer(&self, answer: &str) -> bool {
        answer == self.correct_answer()
    }

    /// The token that `check_answer` accepts.
    pub fn correct_answer(&self) -> String {
        match &self.kind {
            QuestionKind::MultipleChoice { correct, .. } => OPTION_LABELS[*correct].to_string(),
            QuestionKind::TrueFalse { correct } => bool_token(*correct).to_string(),
        }
    }

    pub fn option_descriptors(&self) -> Vec<OptionDescriptor> {
        match &self.kind {
            QuestionKind::MultipleChoice { options, .. } => options
                .iter()
                .zip(OPTION_LABELS)
                .map(|(option, label)| OptionDescriptor {
                    label: label.to_string(),
                    value: label.to_string(),
                    text: option.clone(),
                })
                .collect(),
            QuestionKind::TrueFalse { .. } => vec![
                OptionDescriptor {
                    label: "T".to_string(),
                    value: TRUE_TOKEN.to_string(),
                    text: "True".to_string(),
                },
                OptionDescriptor {
                    label: "F".to_string(),
                    value: FALSE_TOKEN.to_string(),
                    text: "False".to_string(),
                },
            ],
        }
    }
}

fn bool_token(value: bool) -> &'static str {
    if value {
        TRUE_TOKEN
    } else {
        FALSE_TOKEN
    }
}

/// Maps `"A"`..`"D"` to 0..3.
pub fn label_index(label: &str) -> Option<usize> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => OPTION_LABELS.iter().position(|l| *l == c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capitals() -> Question {
        Question::multiple_choice(
            1,
            "What is the capital of France?",
            vec!["Paris".into(), "Rome".into(), "Berlin".into()],
            "A",
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_multiple_choice_check_answer() {
        let question = capitals();
        assert!(question.check_answer("A"));
        assert!(!question.check_answer("B"));
        assert!(!question.check_answer("a"));
        assert!(!question.check_answer("Paris"));
    }

    #[test]
    fn test_true_false_check_answer() {
        let question = Question::true_false(2, "Rust has a garbage collector", false, 1).unwrap();
        assert!(question.check_answer("false"));
        assert!(!question.check_answer("true"));
        assert_eq!(question.correct_answer(), "false");
    }

    #[test]
    fn test_multiple_choice_descriptors() {
        let descriptors = capitals().option_descriptors();
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].label, "A");
        assert_eq!(descriptors[0].value, "A");
        assert_eq!(descriptors[0].text, "Paris");
        assert_eq!(descriptors[2].label, "C");
        assert_eq!(descriptors[2].text, "Berlin");
    }

    #[test]
    fn test_true_false_descriptors() {
        let question = Question::true_false(3, "The sky is blue", true, 1).unwrap();
        let descriptors = question.option_descriptors();
        assert_eq!(
            descriptors,
            vec![
                OptionDescriptor {
                    label: "T".into(),
                    value: "true".into(),
                    text: "True".into(),
                },
                OptionDescriptor {
                    label: "F".into(),
                    value: "false".into(),
                    text: "False".into(),
                },
            ]
        );
        assert!(descriptors.iter().any(|d| question.check_answer(&d.value)));
    }

    #[test]
    fn test_rejects_zero_points() {
        let err = Question::true_false(4, "Zero", true, 0).unwrap_err();
        assert!(matches!(err, QuizError::Configuration(_)));
    }

    #[test]
    fn test_rejects_correct_answer_outside_options() {
        let err = Question::multiple_choice(5, "Pick", vec!["x".into(), "y".into()], "C", 1)
            .unwrap_err();
        assert!(matches!(err, QuizError::Configuration(_)));

        let err = Question::multiple_choice(5, "Pick", vec!["x".into(), "y".into()], "AB", 1)
            .unwrap_err();
        assert!(matches!(err, QuizError::Configuration(_)));
    }

    #[test]
    fn test_rejects_option_count() {
        let five = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        assert!(Question::multiple_choice(6, "Too many", five, "A", 1).is_err());
        assert!(Question::multiple_choice(7, "Too few", vec!["only".into()], "A", 1).is_err());
    }

    #[test]
    fn test_id_and_text_are_editable() {
        let mut question = capitals();
        question.set_id(42);
        question.set_text("Capital of France?");
        assert_eq!(question.id(), 42);
        assert_eq!(question.text(), "Capital of France?");
        assert_eq!(question.points(), 2);
    }

    #[test]
    fn test_descriptors_serialize() {
        let json = serde_json::to_value(capitals().option_descriptors()).unwrap();
        assert_eq!(json[1]["label"], "B");
        assert_eq!(json[1]["text"], "Rome");
    }
}
