use async_trait::async_trait;

pub mod conversation;
pub mod format;
pub mod telegram;
pub mod telegram_commands;

pub use conversation::{ImeiConversation, ModeChoice, Reply, ReplyFormat};
pub use telegram::TelegramAdapter;

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Run the adapter until it is shut down (polling loop, WS connection, etc.).
    async fn start(&self) -> anyhow::Result<()>;
}
