//! Render snapshots handed to the UI after every state change

use super::Session;
use crate::model::{Conversation, ConversationId, Message};

/// Sidebar row for one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub display_name: String,
    pub message_count: usize,
    pub is_selected: bool,
}

/// Everything a UI needs to draw the chat screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// False until the initial conversation fetch has been applied
    pub loaded: bool,
    pub conversations: Vec<ConversationSummary>,
    /// Copy of the active conversation, including optimistic messages
    pub active: Option<Conversation>,
    pub input: String,
    /// A reply is in flight; UIs render a typing placeholder
    pub pending_reply: bool,
}

impl SessionSnapshot {
    pub fn capture(session: &Session, loaded: bool, pending_reply: bool) -> Self {
        let active_id = session.active_id();
        let conversations = session
            .store()
            .conversations()
            .map(|c| ConversationSummary {
                id: c.id.clone(),
                display_name: c.display_name.clone(),
                message_count: c.len(),
                is_selected: active_id == Some(&c.id),
            })
            .collect();

        Self {
            loaded,
            conversations,
            active: session.active_conversation().cloned(),
            input: session.input().to_string(),
            pending_reply,
        }
    }

    pub fn active_id(&self) -> Option<&ConversationId> {
        self.active.as_ref().map(|c| &c.id)
    }

    pub fn active_messages(&self) -> &[Message] {
        self.active
            .as_ref()
            .map(Conversation::messages)
            .unwrap_or_default()
    }

    /// Whether the send button should be enabled
    pub fn can_send(&self) -> bool {
        !self.pending_reply && self.active.is_some() && !self.input.trim().is_empty()
    }
}
