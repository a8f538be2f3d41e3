//! State transition function
//!
//! Applies one event to the controller state and returns the effects the
//! runtime must execute. No I/O happens here.

use super::{Effect, Event, PendingReply, SyncState, FALLBACK_REPLY};
use crate::model::{ConversationId, Message};
use crate::session::SessionError;
use crate::store::StoreError;
use thiserror::Error;

/// Reasons an event is rejected. A rejected event leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("No active conversation")]
    NoActiveConversation,
    #[error("A reply for {0} is still pending")]
    ReplyPending(ConversationId),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Reply for {0} does not match the pending request")]
    UnexpectedReply(ConversationId),
    #[error("Conversations are already loaded")]
    AlreadyLoaded,
}

impl TransitionError {
    /// Rejections that indicate a caller bug rather than ordinary UI noise
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::Session(_) | Self::Store(_) | Self::UnexpectedReply(_) | Self::AlreadyLoaded
        )
    }
}

pub fn transition(state: &mut SyncState, event: Event) -> Result<Vec<Effect>, TransitionError> {
    match event {
        Event::ConversationsLoaded { conversations } => {
            // Loading replaces the store, which would drop an optimistic
            // message and the target of a pending reply
            if state.loaded {
                return Err(TransitionError::AlreadyLoaded);
            }
            state.session.load(conversations);
            state.loaded = true;
            Ok(vec![Effect::PublishSnapshot])
        }

        Event::InputChanged { text } => {
            state.session.set_input(text);
            Ok(vec![Effect::PublishSnapshot])
        }

        Event::ConversationSelected { conversation_id } => {
            state.session.select_conversation(&conversation_id)?;
            Ok(vec![Effect::PublishSnapshot])
        }

        Event::CreateConversation { display_name } => {
            let conversation = state.session.create_and_select(display_name);
            tracing::debug!(conversation_id = %conversation.id, "Created local conversation");
            Ok(vec![Effect::PublishSnapshot])
        }

        Event::SendRequested => begin_send(state),

        Event::ReplyReceived {
            conversation_id,
            reply,
        } => reconcile(state, conversation_id, reply),
    }
}

/// Guard, optimistic append, mark pending
fn begin_send(state: &mut SyncState) -> Result<Vec<Effect>, TransitionError> {
    let text = state.session.input().trim();
    if text.is_empty() {
        return Err(TransitionError::EmptyInput);
    }
    let conversation_id = state
        .session
        .active_id()
        .cloned()
        .ok_or(TransitionError::NoActiveConversation)?;
    if let Some(pending) = &state.pending {
        return Err(TransitionError::ReplyPending(pending.conversation_id.clone()));
    }
    let text = text.to_string();

    state
        .session
        .append_message(&conversation_id, Message::user(text.clone()))?;
    state.session.take_input();
    state.pending = Some(PendingReply {
        conversation_id: conversation_id.clone(),
        text: text.clone(),
    });

    Ok(vec![
        Effect::PublishSnapshot,
        Effect::RequestReply {
            conversation_id,
            text,
        },
    ])
}

/// Append the reply (or fallback) to the conversation captured at send time
/// and clear the pending flag
fn reconcile(
    state: &mut SyncState,
    conversation_id: ConversationId,
    reply: Option<String>,
) -> Result<Vec<Effect>, TransitionError> {
    let matches_pending = state
        .pending
        .as_ref()
        .is_some_and(|p| p.conversation_id == conversation_id);
    if !matches_pending {
        return Err(TransitionError::UnexpectedReply(conversation_id));
    }

    state.pending = None;
    let message = Message::system(reply_content(reply));
    if let Err(e) = state.session.append_message(&conversation_id, message) {
        // Pending is already cleared; the UI still needs to see that
        tracing::error!(error = %e, "Reply target vanished before reconciliation");
    }

    Ok(vec![Effect::PublishSnapshot])
}

/// Reply text, or the fallback when the service gave nothing usable.
///
/// A successful but empty or whitespace-only answer also gets the fallback,
/// so it is not shown verbatim even though the service did return it.
pub fn reply_content(reply: Option<String>) -> String {
    reply
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}
