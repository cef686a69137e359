//! Telegram Bot Commands
//!
//! `/start` offers the mode keyboard, `/help` lists the commands.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "choose live or sandbox mode.")]
    Start,
    #[command(description = "show this help.")]
    Help,
}
