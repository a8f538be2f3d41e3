//! Session state: the store, the active selection and the input draft
//!
//! `Session` is the explicit state container a UI renders from. It never
//! talks to the remote service; the sync layer drives it.

mod selection;
mod snapshot;

pub use selection::Selection;
pub use snapshot::{ConversationSummary, SessionSnapshot};

use crate::ids::short_token;
use crate::model::{Conversation, ConversationId, Message};
use crate::store::{ConversationStore, StoreError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Unknown conversation: {0}")]
    UnknownConversation(ConversationId),
}

#[derive(Debug, Default)]
pub struct Session {
    store: ConversationStore,
    selection: Selection,
    input: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all conversations and re-resolve the selection against them
    pub fn load(&mut self, conversations: impl IntoIterator<Item = Conversation>) {
        self.store.load(conversations);
        self.selection.resolve(&self.store);
    }

    /// Make `conversation_id` the active conversation.
    ///
    /// # Errors
    ///
    /// `SessionError::UnknownConversation` if the id is not in the store; the
    /// selection is left unchanged.
    pub fn select_conversation(&mut self, conversation_id: &ConversationId) -> Result<(), SessionError> {
        self.selection.select(conversation_id, &self.store)
    }

    /// Create a local conversation and make it active in one step.
    ///
    /// Without a name the conversation is called `Conversation <token>`.
    pub fn create_and_select(&mut self, display_name: Option<String>) -> Conversation {
        let display_name =
            display_name.unwrap_or_else(|| format!("Conversation {}", short_token()));
        let conversation = self.store.create_conversation(display_name);
        self.selection.set_unchecked(conversation.id.clone());
        conversation
    }

    pub fn active_id(&self) -> Option<&ConversationId> {
        self.selection.active()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_id().and_then(|id| self.store.get(id))
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Clear the input field, returning what was in it
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub(crate) fn append_message(
        &mut self,
        conversation_id: &ConversationId,
        message: Message,
    ) -> Result<(), StoreError> {
        self.store.append_message(conversation_id, message)
    }
}
