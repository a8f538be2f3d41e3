//! In-memory conversation store
//!
//! Owns every conversation of the session. Appending a whole message is the
//! only mutation; nothing is reordered, deduplicated or removed.

use crate::ids::IdGenerator;
use crate::model::{Conversation, ConversationId, Message};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),
}

/// Mapping of conversation id to conversation, in load/creation order
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: HashMap<ConversationId, Conversation>,
    order: Vec<ConversationId>,
    ids: IdGenerator,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection.
    ///
    /// A repeated id keeps its first position and takes the later contents.
    pub fn load(&mut self, conversations: impl IntoIterator<Item = Conversation>) {
        self.conversations.clear();
        self.order.clear();

        for conversation in conversations {
            let id = conversation.id.clone();
            if self.conversations.insert(id.clone(), conversation).is_some() {
                tracing::warn!(conversation_id = %id, "Duplicate conversation id in load");
            } else {
                self.order.push(id);
            }
        }

        tracing::debug!(count = self.order.len(), "Conversation store loaded");
    }

    /// Insert a new, empty, local-only conversation and return a copy of it
    pub fn create_conversation(&mut self, display_name: impl Into<String>) -> Conversation {
        // Remote ids share the namespace; skip over any that happen to match
        let id = loop {
            let id = self.ids.next_conversation_id();
            if !self.conversations.contains_key(&id) {
                break id;
            }
        };

        let conversation = Conversation::new(id.clone(), display_name);
        self.conversations.insert(id.clone(), conversation.clone());
        self.order.push(id);
        conversation
    }

    /// Append `message` to the end of the named conversation.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no conversation has that id.
    pub fn append_message(
        &mut self,
        conversation_id: &ConversationId,
        message: Message,
    ) -> Result<(), StoreError> {
        let conversation = self
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::NotFound(conversation_id.clone()))?;
        conversation.push(message);
        Ok(())
    }

    pub fn get(&self, conversation_id: &ConversationId) -> Option<&Conversation> {
        self.conversations.get(conversation_id)
    }

    pub fn contains(&self, conversation_id: &ConversationId) -> bool {
        self.conversations.contains_key(conversation_id)
    }

    /// Conversations in load/creation order
    pub fn conversations(&self) -> impl Iterator<Item = &Conversation> {
        self.order
            .iter()
            .filter_map(|id| self.conversations.get(id))
    }

    pub fn first_id(&self) -> Option<&ConversationId> {
        self.order.first()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
