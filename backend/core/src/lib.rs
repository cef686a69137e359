pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use error::BotError;
pub use session::{InMemorySessionStore, SessionStore};
pub use traits::ImeiChecker;
pub use types::{ConversationId, Mode, ParseModeError, RelayOutcome};
