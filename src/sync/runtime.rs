//! Event loop that owns the session and executes effects

use super::{transition, Effect, Event, SyncState};
use crate::config::GatewayConfig;
use crate::gateway::{GatewayError, HttpGateway, LoggingGateway, RemoteGateway};
use crate::model::ConversationId;
use crate::session::{Session, SessionSnapshot};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Sync runtime has stopped")]
pub struct RuntimeStopped;

/// The remote call currently running in the background
struct InFlight {
    conversation_id: ConversationId,
    handle: JoinHandle<Option<String>>,
}

/// Single task that owns all session state.
///
/// Events are applied one at a time. The gateway call runs as a spawned task
/// so selection and typing keep being processed while a reply is pending.
pub struct SyncRuntime<G: RemoteGateway + 'static> {
    state: SyncState,
    gateway: Arc<G>,
    event_rx: mpsc::Receiver<Event>,
    snapshot_tx: watch::Sender<Arc<SessionSnapshot>>,
    in_flight: Option<InFlight>,
}

impl<G: RemoteGateway + 'static> SyncRuntime<G> {
    pub fn new(gateway: G) -> (Self, SyncHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(SessionSnapshot::default()));

        let runtime = Self {
            state: SyncState::new(Session::new()),
            gateway: Arc::new(gateway),
            event_rx,
            snapshot_tx,
            in_flight: None,
        };
        let handle = SyncHandle {
            events: event_tx,
            snapshots: snapshot_rx,
        };
        (runtime, handle)
    }

    /// Start the runtime on the current tokio runtime
    pub fn spawn(gateway: G) -> SyncHandle {
        let (runtime, handle) = Self::new(gateway);
        tokio::spawn(runtime.run());
        handle
    }

    /// Load conversations, then process events until every handle is gone
    /// and no reply is outstanding
    pub async fn run(mut self) {
        tracing::info!("Starting sync runtime");

        let conversations = self.gateway.list_conversations().await;
        self.process_event(Event::ConversationsLoaded { conversations });

        let mut inputs_open = true;
        loop {
            if !inputs_open && self.in_flight.is_none() {
                break;
            }
            tokio::select! {
                event = self.event_rx.recv(), if inputs_open => match event {
                    Some(event) => self.process_event(event),
                    None => inputs_open = false,
                },
                event = settle(&mut self.in_flight), if self.in_flight.is_some() => {
                    self.process_event(event);
                }
            }
        }

        tracing::info!("Sync runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let name = event.name();
        match transition(&mut self.state, event) {
            Ok(effects) => {
                for effect in effects {
                    self.execute_effect(effect);
                }
            }
            Err(e) if e.is_contract_violation() => {
                tracing::warn!(event = name, error = %e, "Event rejected");
            }
            Err(e) => {
                tracing::debug!(event = name, reason = %e, "Event ignored");
            }
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PublishSnapshot => {
                self.snapshot_tx
                    .send_replace(Arc::new(self.state.snapshot()));
            }
            Effect::RequestReply {
                conversation_id,
                text,
            } => self.request_reply(conversation_id, text),
        }
    }

    fn request_reply(&mut self, conversation_id: ConversationId, text: String) {
        debug_assert!(self.in_flight.is_none(), "transition allows one request at a time");

        tracing::info!(conversation_id = %conversation_id, "Requesting reply (background)");
        let gateway = Arc::clone(&self.gateway);
        let target = conversation_id.clone();
        let handle = tokio::spawn(async move { gateway.append_message(&target, &text).await });

        self.in_flight = Some(InFlight {
            conversation_id,
            handle,
        });
    }
}

impl SyncRuntime<LoggingGateway<HttpGateway>> {
    /// Start a runtime talking to the HTTP service described by `config`
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn connect(config: &GatewayConfig) -> Result<SyncHandle, GatewayError> {
        let gateway = LoggingGateway::new(HttpGateway::new(config)?);
        tracing::info!(base_url = %gateway.inner().base_url(), "Connecting sync runtime");
        Ok(Self::spawn(gateway))
    }
}

/// Wait for the in-flight call and turn its outcome into a reply event.
///
/// A failed task (panic) becomes an absent reply so the pending flag is
/// always cleared.
async fn settle(slot: &mut Option<InFlight>) -> Event {
    let Some(in_flight) = slot.as_mut() else {
        return std::future::pending().await;
    };

    let reply = match (&mut in_flight.handle).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(
                conversation_id = %in_flight.conversation_id,
                error = %e,
                "Reply task failed, using fallback"
            );
            None
        }
    };
    let conversation_id = in_flight.conversation_id.clone();
    *slot = None;

    Event::ReplyReceived {
        conversation_id,
        reply,
    }
}

/// Handle for UIs to feed events in and observe snapshots
#[derive(Clone)]
pub struct SyncHandle {
    events: mpsc::Sender<Event>,
    snapshots: watch::Receiver<Arc<SessionSnapshot>>,
}

impl SyncHandle {
    /// # Errors
    ///
    /// `RuntimeStopped` if the runtime task has exited.
    pub async fn dispatch(&self, event: Event) -> Result<(), RuntimeStopped> {
        self.events.send(event).await.map_err(|_| RuntimeStopped)
    }

    /// # Errors
    ///
    /// `RuntimeStopped` if the runtime task has exited.
    pub async fn set_input(&self, text: impl Into<String>) -> Result<(), RuntimeStopped> {
        self.dispatch(Event::InputChanged { text: text.into() }).await
    }

    /// Send whatever is in the input field
    ///
    /// # Errors
    ///
    /// `RuntimeStopped` if the runtime task has exited.
    pub async fn send(&self) -> Result<(), RuntimeStopped> {
        self.dispatch(Event::SendRequested).await
    }

    /// Type `text` into the input field and send it
    ///
    /// # Errors
    ///
    /// `RuntimeStopped` if the runtime task has exited.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), RuntimeStopped> {
        self.set_input(text).await?;
        self.send().await
    }

    /// # Errors
    ///
    /// `RuntimeStopped` if the runtime task has exited.
    pub async fn select(&self, conversation_id: ConversationId) -> Result<(), RuntimeStopped> {
        self.dispatch(Event::ConversationSelected { conversation_id })
            .await
    }

    /// Create a local conversation and make it active
    ///
    /// # Errors
    ///
    /// `RuntimeStopped` if the runtime task has exited.
    pub async fn create_conversation(
        &self,
        display_name: Option<String>,
    ) -> Result<(), RuntimeStopped> {
        self.dispatch(Event::CreateConversation { display_name })
            .await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        Arc::clone(&*self.snapshots.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    pub async fn wait_for(
        &self,
        timeout: Duration,
        mut predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Option<Arc<SessionSnapshot>> {
        let mut rx = self.snapshots.clone();
        let waited = tokio::time::timeout(timeout, async {
            rx.wait_for(|snapshot| predicate(snapshot.as_ref()))
                .await
                .map(|snapshot| Arc::clone(&*snapshot))
        })
        .await;

        match waited {
            Ok(Ok(snapshot)) => Some(snapshot),
            _ => None,
        }
    }
}
