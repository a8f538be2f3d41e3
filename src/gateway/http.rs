//! HTTP implementation of the remote gateway

use super::wire::{
    AppendMessageRequest, AppendMessageResponse, ListConversationsResponse, HUMAN_ROLE,
};
use super::{GatewayError, RemoteGateway};
use crate::config::GatewayConfig;
use crate::model::{Conversation, ConversationId};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, Url};

/// Talks to the answering service over JSON/HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// # Errors
    ///
    /// `InvalidUrl` if the configured base URL does not parse or cannot
    /// carry a path. `Network` if the HTTP client cannot be constructed
    /// (e.g., TLS backend initialization failure).
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::invalid_url(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::invalid_url(format!(
                "{} cannot be a base",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Turn a non-2xx response into a status error, keeping the body for logs
async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::status(
        status.as_u16(),
        format!("HTTP {}: {}", status.as_u16(), body.trim()),
    ))
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, GatewayError> {
        let url = self.endpoint(&["conversations"]);
        let response = check_status(self.client.get(url).send().await?).await?;
        let body: ListConversationsResponse = response.json().await?;

        let received_at = Utc::now();
        Ok(body
            .conversations
            .into_iter()
            .map(|c| c.into_conversation(received_at))
            .collect())
    }

    async fn post_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<String, GatewayError> {
        let url = self.endpoint(&["conversations", conversation_id.as_str(), "messages"]);
        let request = AppendMessageRequest {
            conversation_id: conversation_id.as_str(),
            author: HUMAN_ROLE,
            message: text,
        };
        let response = check_status(self.client.post(url).json(&request).send().await?).await?;
        let body: AppendMessageResponse = response.json().await?;
        Ok(body.answer)
    }
}
