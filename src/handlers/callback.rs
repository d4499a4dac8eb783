use crate::BotState;
use std::error::Error;
use std::sync::Arc;
use teloxide::dispatching::DpHandlerDescription;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MessageId};
use crate::keyboard::{create_keyboard, parse_callback, CallbackAction};

use crate::handlers::{finish_quiz, navigate, NO_QUIZ};

pub fn callback_handler(
    state: Arc<BotState>,
) -> dptree::Handler<'static, DependencyMap, Result<(), Box<dyn Error + Send + Sync>>, DpHandlerDescription>
{
    Update::filter_callback_query()
        .endpoint(move |bot: Bot, q: CallbackQuery| {
            let state = state.clone();
            async move {
                handle_callback_query(bot, q, state).await
            }
        })
}

pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    state: Arc<BotState>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if let (Some(message), Some(data)) = (query.message, query.data) {
        let chat_id = message.chat.id;

        match parse_callback(&data) {
            CallbackAction::Answer(value) => {
                answer_question(&bot, chat_id, message.id, &state, &value).await?
            }
            CallbackAction::Next => navigate(&bot, chat_id, &state, true).await?,
            CallbackAction::Previous => navigate(&bot, chat_id, &state, false).await?,
            CallbackAction::End => match state.active_quiz(chat_id.0).await {
                Some(quiz) => finish_quiz(&bot, chat_id, &state, &quiz.session).await?,
                None => {
                    bot.send_message(chat_id, NO_QUIZ).await?;
                }
            },
            CallbackAction::Unknown => {
                log::warn!("Ignoring unknown callback data {:?} in chat {}", data, chat_id);
            }
        }
    }

    bot.answer_callback_query(query.id).await?;
    Ok(())
}

async fn answer_question(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    state: &BotState,
    value: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(quiz) = state.active_quiz(chat_id.0).await else {
        bot.send_message(chat_id, NO_QUIZ).await?;
        return Ok(());
    };

    // Buttons of an older message must not answer whatever question is current now
    if quiz.message_id != Some(message_id) {
        bot.send_message(chat_id, "That question is no longer on screen.")
            .await?;
        return Ok(());
    }

    let correct = match quiz.session.submit_answer(value).await {
        Ok(correct) => correct,
        Err(e) => {
            bot.send_message(chat_id, e.to_string()).await?;
            return Ok(());
        }
    };

    let (keyboard, points) = {
        let session = quiz.session.state().await;
        (
            create_keyboard(&session.option_descriptors(), session.current_answer(), true),
            session.current_question().points(),
        )
    };
    bot.edit_message_reply_markup(chat_id, message_id)
        .reply_markup(keyboard)
        .await?;

    if correct {
        bot.send_message(
            chat_id,
            format!("🎉 Correct! You earned {} points!", points),
        )
        .await?;
    } else {
        bot.send_message(chat_id, "❌ Sorry, that's incorrect!")
            .await?;
    }
    Ok(())
}
