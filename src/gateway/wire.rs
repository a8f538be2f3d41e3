//! Wire format of the remote service

use crate::model::{Author, Conversation, ConversationId, Message, MessageId};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Role tag the service uses for the local user
pub const HUMAN_ROLE: &str = "human";

/// `GET /conversations` response body
#[derive(Debug, Deserialize)]
pub struct ListConversationsResponse {
    #[serde(default)]
    pub conversations: Vec<WireConversation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConversation {
    pub conversation_id: WireId,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WireMessage {
    pub id: WireId,
    pub author: String,
    pub text: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Identifiers arrive as either JSON strings or integers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Text(s) => f.write_str(s),
            WireId::Number(n) => write!(f, "{n}"),
        }
    }
}

/// `POST /conversations/{id}/messages` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendMessageRequest<'a> {
    pub conversation_id: &'a str,
    pub author: &'a str,
    pub message: &'a str,
}

/// `POST /conversations/{id}/messages` response body
#[derive(Debug, Deserialize)]
pub struct AppendMessageResponse {
    pub answer: String,
}

/// Map a wire role tag onto the local author enum
pub fn author_from_role(role: &str) -> Author {
    if role == HUMAN_ROLE {
        Author::User
    } else {
        Author::System
    }
}

/// Display name for a conversation that came from the remote side
pub fn remote_display_name(id: &ConversationId) -> String {
    format!("Conversation {id}")
}

impl WireConversation {
    /// Convert to the local model. Messages without a usable timestamp are
    /// stamped with `received_at`.
    pub fn into_conversation(self, received_at: DateTime<Utc>) -> Conversation {
        let id = ConversationId::new(self.conversation_id.to_string());
        let messages = self
            .messages
            .into_iter()
            .map(|m| m.into_message(received_at))
            .collect();
        let display_name = remote_display_name(&id);
        Conversation::with_messages(id, display_name, messages)
    }
}

impl WireMessage {
    fn into_message(self, received_at: DateTime<Utc>) -> Message {
        Message::new(
            MessageId::new(self.id.to_string()),
            author_from_role(&self.author),
            self.text,
            self.timestamp.unwrap_or(received_at),
        )
    }
}

/// Accept RFC 3339 strings or epoch milliseconds; anything else is treated
/// as missing rather than failing the whole payload.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    })
}
