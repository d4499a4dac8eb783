use std::error::Error;
use std::sync::Arc;
use teloxide::prelude::*;

use quiz_session_bot::{callback_handler, command_handler, load_questions, BotState, Command, QuizConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    log::info!("Starting quiz bot...");

    let config = QuizConfig::from_env()?;
    log::info!(
        "{} questions per quiz, {}s per question",
        config.questions_per_quiz,
        config.time_per_question
    );

    // Load questions from CSV
    let questions = load_questions(&config.questions_file)?;
    log::info!("Loaded {} questions", questions.len());

    // Initialize bot with token from environment
    let bot = Bot::from_env();
    let state = Arc::new(BotState::new(questions, config));

    let handler = dptree::entry()
        .branch(Update::filter_message().filter_command::<Command>().endpoint(
            |bot: Bot, msg: Message, cmd: Command, state: Arc<BotState>| async move {
                command_handler(bot, msg, cmd, state).await
            },
        ))
        .branch(callback_handler(state.clone()));

    log::info!("Starting command dispatching...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
