//! Controller state

use crate::model::ConversationId;
use crate::session::{Session, SessionSnapshot};

/// The send that is waiting for its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// Conversation that was active when the message was sent
    pub conversation_id: ConversationId,
    pub text: String,
}

/// Session plus the controller's transient state
#[derive(Debug, Default)]
pub struct SyncState {
    pub session: Session,
    /// Initial fetch has been applied
    pub loaded: bool,
    pub(super) pending: Option<PendingReply>,
}

impl SyncState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            loaded: false,
            pending: None,
        }
    }

    /// The pending-reply flag
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingReply> {
        self.pending.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.session, self.loaded, self.is_pending())
    }
}
