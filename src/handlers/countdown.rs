use crate::session::QuizSession;
use crate::state::BotState;
use crate::types::SessionEvent;
use std::error::Error;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::handlers::{finish_quiz, show_current_question};

/// Relays clock-driven changes of one quiz to its chat until the quiz ends.
/// A quiz whose countdown has stopped and that sees no activity for
/// `idle_timeout` is ended, so abandoned quizzes do not linger.
pub async fn watch_countdown(
    bot: Bot,
    chat_id: ChatId,
    session: QuizSession,
    mut events: broadcast::Receiver<SessionEvent>,
    state: Arc<BotState>,
) {
    loop {
        let received = match tokio::time::timeout(state.config.idle_timeout, events.recv()).await {
            Ok(received) => received,
            Err(_) => {
                log::info!("Quiz in chat {} went idle, ending it", chat_id);
                if let Err(e) = finish_quiz(&bot, chat_id, &state, &session).await {
                    log::error!("Failed to finish idle quiz in chat {}: {}", chat_id, e);
                }
                break;
            }
        };
        let event = match received {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("Chat {} missed {} quiz events", chat_id, skipped);
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let result: Result<(), Box<dyn Error + Send + Sync>> = match event {
            SessionEvent::Expired { advanced: true, .. } => {
                match bot.send_message(chat_id, "⏰ Time's up! Moving on.").await {
                    Ok(_) => show_current_question(&bot, chat_id, &state, &session).await,
                    Err(e) => Err(e.into()),
                }
            }
            SessionEvent::Expired { advanced: false, .. } => {
                let text = if state.config.auto_end {
                    "⏰ Time's up on the last question!"
                } else {
                    "⏰ Time's up on the last question! Use /end to see your score."
                };
                bot.send_message(chat_id, text).await.map(|_| ()).map_err(Into::into)
            }
            SessionEvent::Ended { .. } => {
                if let Err(e) = finish_quiz(&bot, chat_id, &state, &session).await {
                    log::error!("Failed to finish quiz in chat {}: {}", chat_id, e);
                }
                break;
            }
            SessionEvent::Started | SessionEvent::Tick { .. } => Ok(()),
        };

        if let Err(e) = result {
            log::error!("Failed to report countdown in chat {}: {}", chat_id, e);
        }
    }
    log::debug!("Stopped watching quiz in chat {}", chat_id);
}
