//! Mock gateway for testing
//!
//! Lets tests script the remote side without any network I/O.

use crate::gateway::{GatewayError, RemoteGateway};
use crate::model::{Conversation, ConversationId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

/// Gateway that returns queued replies and records every call
pub struct MockGateway {
    conversations: Vec<Conversation>,
    fail_list: bool,
    panic_on_post: bool,
    /// `None` entries fail the call
    replies: Mutex<VecDeque<Option<String>>>,
    calls: Mutex<Vec<(ConversationId, String)>>,
    /// When set, each post waits for a permit before answering
    gate: Option<Semaphore>,
    /// Notified when a post starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            conversations: Vec::new(),
            fail_list: false,
            panic_on_post: false,
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn with_conversations(mut self, conversations: Vec<Conversation>) -> Self {
        self.conversations = conversations;
        self
    }

    /// Listing fails with a 500
    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Hold every reply until [`MockGateway::release`] is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_post = true;
        self
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Some(text.into()));
    }

    /// Queue a failed call
    pub fn queue_absent(&self) {
        self.replies.lock().unwrap().push_back(None);
    }

    /// Let one gated reply through
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn recorded_calls(&self) -> Vec<(ConversationId, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, GatewayError> {
        if self.fail_list {
            return Err(GatewayError::status(500, "HTTP 500: mock failure"));
        }
        Ok(self.conversations.clone())
    }

    async fn post_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((conversation_id.clone(), text.to_string()));
        self.request_started.notify_one();

        assert!(!self.panic_on_post, "mock gateway panicked");

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        match self.replies.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(GatewayError::status(503, "HTTP 503: mock failure")),
            None => Err(GatewayError::network("No mock reply queued")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayErrorKind;

    #[tokio::test]
    async fn test_mock_gateway_replays_queue() {
        let mock = MockGateway::new();
        mock.queue_reply("hi there");
        mock.queue_absent();
        let id = ConversationId::new("c1");

        assert_eq!(mock.post_message(&id, "one").await.unwrap(), "hi there");
        assert_eq!(
            mock.post_message(&id, "two").await.unwrap_err().kind,
            GatewayErrorKind::Status(503)
        );
        assert_eq!(
            mock.post_message(&id, "three").await.unwrap_err().kind,
            GatewayErrorKind::Network
        );
        assert_eq!(mock.recorded_calls().len(), 3);
    }

    #[tokio::test]
    async fn test_gated_mock_waits_for_release() {
        let mock = Arc::new(MockGateway::new().gated());
        mock.queue_reply("later");

        let task = {
            let mock = Arc::clone(&mock);
            tokio::spawn(async move {
                mock.post_message(&ConversationId::new("c1"), "hello")
                    .await
            })
        };
        mock.request_started.notified().await;
        assert!(!task.is_finished());

        mock.release();
        assert_eq!(task.await.unwrap().unwrap(), "later");
    }
}
