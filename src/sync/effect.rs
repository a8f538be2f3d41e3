//! Effects produced by transitions

use crate::model::ConversationId;

/// Work for the runtime to carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Push a fresh snapshot to the UI
    PublishSnapshot,

    /// Ask the gateway for a reply (spawns as background task)
    RequestReply {
        conversation_id: ConversationId,
        text: String,
    },
}
