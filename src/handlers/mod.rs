mod callback;
mod command;
mod countdown;

pub use callback::*;
pub use command::*;
pub use countdown::*;

use crate::keyboard::create_keyboard;
use crate::session::{QuizSession, SessionState};
use crate::state::BotState;
use std::error::Error;
use teloxide::prelude::*;
use teloxide::types::InlineKeyboardMarkup;

pub(crate) const NO_QUIZ: &str = "No quiz running. Use /quiz to start one.";

/// Message text and keyboard for the question the session is on.
pub fn question_view(session: &SessionState) -> (String, InlineKeyboardMarkup) {
    let question = session.current_question();
    let text = format!(
        "Question {}/{}  ⏱ {}s  ({} pt)\n\n{}",
        session.current_question_index() + 1,
        session.questions().len(),
        session.time_remaining(),
        question.points(),
        question.text()
    );
    let keyboard = create_keyboard(
        &question.option_descriptors(),
        session.current_answer(),
        true,
    );
    (text, keyboard)
}

pub(crate) async fn show_current_question(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    session: &QuizSession,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (text, keyboard) = question_view(&*session.state().await);
    let sent = bot.send_message(chat_id, text).reply_markup(keyboard).await?;

    if let Some(active) = state.active_quizzes.lock().await.get_mut(&chat_id.0) {
        if active.session.same_session(session) {
            active.message_id = Some(sent.id);
        }
    }
    Ok(())
}

pub(crate) async fn navigate(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    forward: bool,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(quiz) = state.active_quiz(chat_id.0).await else {
        bot.send_message(chat_id, NO_QUIZ).await?;
        return Ok(());
    };

    let moved = if forward {
        quiz.session.next_question().await
    } else {
        quiz.session.previous_question().await
    };

    match moved {
        Ok(true) => show_current_question(bot, chat_id, state, &quiz.session).await?,
        Ok(false) if forward => {
            bot.send_message(chat_id, "This is the last question. Use /end to finish.")
                .await?;
        }
        Ok(false) => {
            bot.send_message(chat_id, "This is the first question.").await?;
        }
        Err(e) => {
            bot.send_message(chat_id, e.to_string()).await?;
        }
    }
    Ok(())
}

/// Ends `session` and reports the result, if it is still the chat's active quiz.
pub(crate) async fn finish_quiz(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    session: &QuizSession,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    {
        let mut active_quizzes = state.active_quizzes.lock().await;
        match active_quizzes.get(&chat_id.0) {
            Some(active) if active.session.same_session(session) => {
                active_quizzes.remove(&chat_id.0);
            }
            _ => return Ok(()),
        }
    }

    session.end().await?;
    let summary = session.state().await.summary();
    match serde_json::to_string(&summary) {
        Ok(json) => log::info!("Quiz finished in chat {}: {}", chat_id, json),
        Err(e) => log::error!("Failed to serialize quiz summary: {}", e),
    }

    bot.send_message(
        chat_id,
        format!(
            "Quiz completed! Your final score: {}/{} points\nAnswered {} of {} questions in {}",
            summary.score,
            summary.total_points,
            summary.answered,
            summary.question_count,
            summary.formatted_time
        ),
    )
    .await?;
    Ok(())
}
