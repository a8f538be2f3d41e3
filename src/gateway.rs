//! Remote service boundary
//!
//! The gateway exposes two layers. `fetch_conversations` and `post_message`
//! return typed errors; `list_conversations` and `append_message` collapse
//! every failure into an empty list or an absent reply, which is all the
//! rest of the crate ever sees.

mod error;
mod http;
pub mod wire;

pub use error::{GatewayError, GatewayErrorKind};
pub use http::HttpGateway;

use crate::model::{Conversation, ConversationId};
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for the answering service
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch every conversation known to the service
    ///
    /// # Errors
    ///
    /// Transport, non-2xx status or undecodable body.
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, GatewayError>;

    /// Send a user message and return the service's answer
    ///
    /// # Errors
    ///
    /// Transport, non-2xx status or undecodable body.
    async fn post_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<String, GatewayError>;

    /// Like `fetch_conversations`, but any failure yields an empty list.
    ///
    /// Callers cannot tell "no conversations" from "fetch failed".
    async fn list_conversations(&self) -> Vec<Conversation> {
        match self.fetch_conversations().await {
            Ok(conversations) => conversations,
            Err(e) => {
                tracing::warn!(
                    error = %e.message,
                    kind = ?e.kind,
                    "Listing conversations failed, continuing with none"
                );
                Vec::new()
            }
        }
    }

    /// Like `post_message`, but any failure yields `None`
    async fn append_message(&self, conversation_id: &ConversationId, text: &str) -> Option<String> {
        match self.post_message(conversation_id, text).await {
            Ok(answer) => Some(answer),
            Err(e) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    error = %e.message,
                    kind = ?e.kind,
                    "Appending message failed, reply absent"
                );
                None
            }
        }
    }
}

#[async_trait]
impl<T: RemoteGateway + ?Sized> RemoteGateway for Arc<T> {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, GatewayError> {
        (**self).fetch_conversations().await
    }

    async fn post_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<String, GatewayError> {
        (**self).post_message(conversation_id, text).await
    }
}

/// Logging wrapper that times every remote call
pub struct LoggingGateway<G> {
    inner: G,
}

impl<G: RemoteGateway> LoggingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: RemoteGateway> RemoteGateway for LoggingGateway<G> {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, GatewayError> {
        let start = std::time::Instant::now();
        let result = self.inner.fetch_conversations().await;
        let duration = start.elapsed();

        match &result {
            Ok(conversations) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    count = conversations.len(),
                    "Fetched conversations"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    server_error = e.kind.is_server_error(),
                    "Fetching conversations failed"
                );
            }
        }

        result
    }

    async fn post_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<String, GatewayError> {
        let start = std::time::Instant::now();
        let result = self.inner.post_message(conversation_id, text).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    conversation_id = %conversation_id,
                    duration_ms = %duration.as_millis(),
                    answer_len = answer.len(),
                    "Message answered"
                );
            }
            Err(e) => {
                tracing::error!(
                    conversation_id = %conversation_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    server_error = e.kind.is_server_error(),
                    "Posting message failed"
                );
            }
        }

        result
    }
}
