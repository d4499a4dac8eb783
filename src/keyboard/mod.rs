use crate::types::OptionDescriptor;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub const ANSWER_PREFIX: &str = "answer:";
pub const NEXT_QUESTION: &str = "nav:next";
pub const PREVIOUS_QUESTION: &str = "nav:prev";
pub const END_QUIZ: &str = "end_quiz";

/// What a pressed button asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Answer(String),
    Next,
    Previous,
    End,
    Unknown,
}

pub fn parse_callback(data: &str) -> CallbackAction {
    match data {
        NEXT_QUESTION => CallbackAction::Next,
        PREVIOUS_QUESTION => CallbackAction::Previous,
        END_QUIZ => CallbackAction::End,
        _ => match data.strip_prefix(ANSWER_PREFIX) {
            Some(value) if !value.is_empty() => CallbackAction::Answer(value.to_string()),
            _ => CallbackAction::Unknown,
        },
    }
}

/// One button per option; the recorded answer, if any, is the only one marked.
pub fn create_keyboard(
    options: &[OptionDescriptor],
    selected_answer: Option<&str>,
    show_navigation: bool,
) -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = options
        .iter()
        .map(|option| {
            let mut text = format!("{}. {}", option.label, option.text);
            if selected_answer == Some(option.value.as_str()) {
                text = format!("● {}", text);
            }
            vec![InlineKeyboardButton::callback(
                text,
                format!("{}{}", ANSWER_PREFIX, option.value),
            )]
        })
        .collect();

    if show_navigation {
        keyboard.push(vec![
            InlineKeyboardButton::callback("◀ Prev".to_string(), PREVIOUS_QUESTION.to_string()),
            InlineKeyboardButton::callback("Next ▶".to_string(), NEXT_QUESTION.to_string()),
        ]);
        keyboard.push(vec![InlineKeyboardButton::callback(
            "🛑 End Quiz".to_string(),
            END_QUIZ.to_string(),
        )]);
    }

    InlineKeyboardMarkup::new(keyboard)
}
