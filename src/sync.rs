//! Synchronization controller
//!
//! Implements the optimistic send protocol as an event/effect loop. UI
//! events go through [`transition`], which mutates the session and returns
//! effects; [`SyncRuntime`] executes those effects, running the remote call
//! in the background and feeding the reply back in as another event.

mod effect;
pub mod event;
mod runtime;
mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use runtime::{RuntimeStopped, SyncHandle, SyncRuntime};
pub use state::{PendingReply, SyncState};
pub use transition::{transition, TransitionError};

/// System message content used when the service produces no reply
pub const FALLBACK_REPLY: &str = "Sorry, I did not understand that.";
