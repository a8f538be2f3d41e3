//! Events that drive the session

use crate::model::{Conversation, ConversationId};

/// Inputs to [`super::transition`]
#[derive(Debug, Clone)]
pub enum Event {
    /// Result of the startup fetch (already collapsed to empty on failure)
    ConversationsLoaded { conversations: Vec<Conversation> },

    // UI events
    InputChanged { text: String },
    SendRequested,
    ConversationSelected { conversation_id: ConversationId },
    CreateConversation { display_name: Option<String> },

    /// The remote call for `conversation_id` finished
    ReplyReceived {
        conversation_id: ConversationId,
        reply: Option<String>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ConversationsLoaded { .. } => "conversations_loaded",
            Event::InputChanged { .. } => "input_changed",
            Event::SendRequested => "send_requested",
            Event::ConversationSelected { .. } => "conversation_selected",
            Event::CreateConversation { .. } => "create_conversation",
            Event::ReplyReceived { .. } => "reply_received",
        }
    }
}
