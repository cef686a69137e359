//! Per-conversation mode selection.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::{ConversationId, Mode};

/// Storage for the one piece of state a conversation carries.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record the mode for a conversation, replacing any previous one.
    async fn set_mode(&self, conversation: ConversationId, mode: Mode);

    /// `None` until a mode has been selected.
    async fn get_mode(&self, conversation: ConversationId) -> Option<Mode>;
}

/// Process-local store. State lives as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    modes: RwLock<HashMap<ConversationId, Mode>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set_mode(&self, conversation: ConversationId, mode: Mode) {
        let previous = self.modes.write().await.insert(conversation, mode);
        debug!(%conversation, %mode, ?previous, "Mode selected");
    }

    async fn get_mode(&self, conversation: ConversationId) -> Option<Mode> {
        self.modes.read().await.get(&conversation).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unset_until_selected() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get_mode(ConversationId(1)).await, None);
    }

    #[tokio::test]
    async fn last_selection_wins() {
        let store = InMemorySessionStore::new();
        let conv = ConversationId(42);
        store.set_mode(conv, Mode::Live).await;
        assert_eq!(store.get_mode(conv).await, Some(Mode::Live));
        store.set_mode(conv, Mode::Sandbox).await;
        assert_eq!(store.get_mode(conv).await, Some(Mode::Sandbox));
    }

    #[tokio::test]
    async fn conversations_are_partitioned() {
        let store = InMemorySessionStore::new();
        store.set_mode(ConversationId(1), Mode::Live).await;
        store.set_mode(ConversationId(2), Mode::Sandbox).await;
        assert_eq!(store.get_mode(ConversationId(1)).await, Some(Mode::Live));
        assert_eq!(store.get_mode(ConversationId(2)).await, Some(Mode::Sandbox));
        assert_eq!(store.get_mode(ConversationId(3)).await, None);
    }
}
