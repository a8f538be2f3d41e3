//! Active conversation tracking

use super::SessionError;
use crate::model::ConversationId;
use crate::store::ConversationStore;

/// Reference (by id) to the active conversation.
///
/// When set, the id exists in the store it was resolved against. Anything
/// that can drop conversations from the store must call [`Selection::resolve`]
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: Option<ConversationId>,
}

impl Selection {
    pub fn active(&self) -> Option<&ConversationId> {
        self.active.as_ref()
    }

    /// # Errors
    ///
    /// `SessionError::UnknownConversation` if `store` has no such id.
    pub fn select(
        &mut self,
        conversation_id: &ConversationId,
        store: &ConversationStore,
    ) -> Result<(), SessionError> {
        if !store.contains(conversation_id) {
            tracing::warn!(conversation_id = %conversation_id, "Selecting unknown conversation");
            return Err(SessionError::UnknownConversation(conversation_id.clone()));
        }
        self.active = Some(conversation_id.clone());
        Ok(())
    }

    /// Keep the current selection if it still exists, otherwise fall back to
    /// the first conversation (or none for an empty store)
    pub fn resolve(&mut self, store: &ConversationStore) {
        let still_valid = self.active.as_ref().is_some_and(|id| store.contains(id));
        if !still_valid {
            self.active = store.first_id().cloned();
        }
    }

    /// Caller guarantees the id was just inserted into the store
    pub(crate) fn set_unchecked(&mut self, conversation_id: ConversationId) {
        self.active = Some(conversation_id);
    }
}
