//! chat_sync - client-side conversation manager
//!
//! Holds a local collection of conversations and keeps it in sync with a
//! remote answering service. User messages are appended optimistically, a
//! pending flag brackets the remote call, and the reply (or a fixed fallback)
//! is reconciled into the conversation the message was sent from.

pub mod config;
pub mod gateway;
mod ids;
pub mod model;
pub mod session;
pub mod store;
pub mod sync;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use config::GatewayConfig;
pub use gateway::{GatewayError, GatewayErrorKind, HttpGateway, LoggingGateway, RemoteGateway};
pub use model::{Author, Conversation, ConversationId, Message, MessageId};
pub use session::{ConversationSummary, Session, SessionError, SessionSnapshot};
pub use store::{ConversationStore, StoreError};
pub use sync::{Effect, Event, SyncHandle, SyncRuntime, SyncState, FALLBACK_REPLY};
