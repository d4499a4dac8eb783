use crate::{BotState, Command};
use std::error::Error;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use crate::session::QuizSession;
use crate::types::ActiveQuiz;

use crate::handlers::*;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cmd {
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                format!(
                    "
                    \n 📝 Use /quiz to start a quiz of {} questions, {} seconds each.
                    \n ⏭ Use /next and /prev (or the buttons) to move between questions.
                    \n ⏱ When the clock runs out the quiz moves on by itself.
                    \n 🏁 Use /end to finish and see your score, /status to check progress.
                    \n ❓ Use /help for additional guidance.
                    ",
                    state.config.questions_per_quiz, state.config.time_per_question
                ),
            )
            .await?;
        }
        Command::Quiz => start_new_quiz(bot, msg.chat.id, state).await?,
        Command::Next => navigate(&bot, msg.chat.id, &state, true).await?,
        Command::Prev => navigate(&bot, msg.chat.id, &state, false).await?,
        Command::End => match state.active_quiz(msg.chat.id.0).await {
            Some(quiz) => finish_quiz(&bot, msg.chat.id, &state, &quiz.session).await?,
            None => {
                bot.send_message(msg.chat.id, NO_QUIZ).await?;
            }
        },
        Command::Status => {
            let status = match state.active_quiz(msg.chat.id.0).await {
                Some(quiz) => {
                    let session = quiz.session.state().await;
                    format!(
                        "Question {}/{}\nScore: {}/{} points\n⏱ {}s left on this question\nElapsed: {}",
                        session.current_question_index() + 1,
                        session.questions().len(),
                        session.score(),
                        session.total_points(),
                        session.time_remaining(),
                        session.format_time_spent()
                    )
                }
                None => NO_QUIZ.to_string(),
            };
            bot.send_message(msg.chat.id, status).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }
    Ok(())
}

// Replaces whatever quiz the chat had with a fresh one
async fn start_new_quiz(
    bot: Bot,
    chat_id: ChatId,
    state: Arc<BotState>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if let Some(previous) = state.active_quiz(chat_id.0).await {
        finish_quiz(&bot, chat_id, &state, &previous.session).await?;
    }

    let questions = state.draw_questions().await;
    let session = QuizSession::from_config(questions, &state.config)?;
    let events = session.subscribe();

    state.active_quizzes.lock().await.insert(
        chat_id.0,
        ActiveQuiz {
            session: session.clone(),
            message_id: None,
        },
    );
    session.start().await?;
    log::info!("Started quiz in chat {}", chat_id);

    tokio::spawn(watch_countdown(
        bot.clone(),
        chat_id,
        session.clone(),
        events,
        state.clone(),
    ));

    show_current_question(&bot, chat_id, &state, &session).await
}
