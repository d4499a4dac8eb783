use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Start a timed quiz")]
    Quiz,
    #[command(description = "Go to the next question")]
    Next,
    #[command(description = "Go back to the previous question")]
    Prev,
    #[command(description = "Finish the current quiz")]
    End,
    #[command(description = "Show score and time")]
    Status,
    #[command(description = "Show help message")]
    Help,
}
