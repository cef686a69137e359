use std::sync::Arc;

use crate::ChannelAdapter;
use crate::conversation::{ImeiConversation, Reply, ReplyFormat};
use crate::telegram_commands::Command;
use async_trait::async_trait;
use imeibot_core::{BotError, ConversationId};
use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, MaybeInaccessibleMessage, MessageId, ParseMode,
};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

pub struct TelegramAdapter {
    bot: Bot,
    conversation: Arc<ImeiConversation>,
}

impl TelegramAdapter {
    pub fn new(token: String, conversation: Arc<ImeiConversation>) -> Self {
        Self {
            bot: Bot::new(token),
            conversation,
        }
    }
}

#[async_trait]
impl ChannelAdapter for TelegramAdapter {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Telegram adapter");

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "Failed to register bot commands");
        }

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .branch(dptree::entry().filter_command::<Command>().endpoint(on_command))
                    .branch(dptree::endpoint(on_text)),
            )
            .branch(Update::filter_callback_query().endpoint(on_callback));

        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.conversation.clone()])
            .default_handler(|update| async move {
                debug!(id = ?update.id, "Unhandled update");
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram adapter stopped");
        Ok(())
    }
}

async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    conversation: Arc<ImeiConversation>,
) -> Result<(), BotError> {
    let chat_id = msg.chat.id;
    let reply = match cmd {
        Command::Start => conversation.start(),
        Command::Help => Reply::plain(Command::descriptions().to_string()),
    };
    let bot = &bot;
    conversation
        .recover(
            ConversationId(chat_id.0),
            send_reply(bot, chat_id, &reply),
            move |apology| async move { send_reply(bot, chat_id, &apology).await },
        )
        .await
}

async fn on_text(
    bot: Bot,
    msg: Message,
    conversation: Arc<ImeiConversation>,
) -> Result<(), BotError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    // Commands the bot doesn't know.
    if text.starts_with('/') {
        debug!(chat_id = %msg.chat.id, "Ignoring unknown command");
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let bot = &bot;
    conversation
        .recover(
            ConversationId(chat_id.0),
            relay_text(bot, chat_id, text, &conversation),
            move |apology| async move { send_reply(bot, chat_id, &apology).await },
        )
        .await
}

async fn relay_text(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    conversation: &ImeiConversation,
) -> Result<(), BotError> {
    let replies = conversation
        .handle_text(ConversationId(chat_id.0), text)
        .await?;
    for reply in &replies {
        send_reply(bot, chat_id, reply).await?;
    }
    Ok(())
}

async fn on_callback(
    bot: Bot,
    q: CallbackQuery,
    conversation: Arc<ImeiConversation>,
) -> Result<(), BotError> {
    let (chat_id, prompt) = match &q.message {
        Some(MaybeInaccessibleMessage::Regular(m)) => (m.chat.id, Some(m.id)),
        Some(MaybeInaccessibleMessage::Inaccessible(m)) => (m.chat.id, None),
        None => (ChatId::from(q.from.id), None),
    };
    let bot = &bot;
    conversation
        .recover(
            ConversationId(chat_id.0),
            select_from_callback(bot, &q, chat_id, prompt, &conversation),
            move |apology| async move { send_reply(bot, chat_id, &apology).await },
        )
        .await
}

async fn select_from_callback(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    prompt: Option<MessageId>,
    conversation: &ImeiConversation,
) -> Result<(), BotError> {
    bot.answer_callback_query(q.id.clone())
        .await
        .map_err(BotError::channel)?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let reply = conversation
        .select_mode(ConversationId(chat_id.0), data)
        .await;
    match prompt {
        Some(message_id) => edit_reply(bot, chat_id, message_id, &reply).await,
        None => send_reply(bot, chat_id, &reply).await,
    }
}

fn keyboard(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    if reply.choices.is_empty() {
        return None;
    }
    let rows = reply
        .choices
        .iter()
        .map(|c| vec![InlineKeyboardButton::callback(c.label.clone(), c.data.clone())]);
    Some(InlineKeyboardMarkup::new(rows))
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<(), BotError> {
    let mut request = bot.send_message(chat_id, reply.text.clone());
    if reply.format == ReplyFormat::Html {
        request = request.parse_mode(ParseMode::Html);
    }
    if let Some(markup) = keyboard(reply) {
        request = request.reply_markup(markup);
    }
    request.await.map_err(BotError::channel)?;
    Ok(())
}

/// Replace the keyboard prompt in place so the buttons can't be pressed twice.
async fn edit_reply(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    reply: &Reply,
) -> Result<(), BotError> {
    let mut request = bot.edit_message_text(chat_id, message_id, reply.text.clone());
    if reply.format == ReplyFormat::Html {
        request = request.parse_mode(ParseMode::Html);
    }
    if let Some(markup) = keyboard(reply) {
        request = request.reply_markup(markup);
    }
    request.await.map_err(BotError::channel)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ModeChoice;

    #[test]
    fn keyboard_has_one_button_per_row() {
        let reply = Reply {
            text: "Choose a mode:".into(),
            format: ReplyFormat::Plain,
            choices: vec![
                ModeChoice::from(imeibot_core::Mode::Live),
                ModeChoice::from(imeibot_core::Mode::Sandbox),
            ],
        };
        let markup = keyboard(&reply).unwrap();
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(markup.inline_keyboard[0][0].text, "Mode live");
    }

    #[test]
    fn plain_reply_has_no_keyboard() {
        assert!(keyboard(&Reply::plain("hi")).is_none());
    }
}
