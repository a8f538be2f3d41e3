//! Gateway error types

use thiserror::Error;

/// Remote call failure with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Network, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Status(code), message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Decode, message)
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::InvalidUrl, message)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::status(status.as_u16(), e.to_string())
        } else {
            Self::network(e.to_string())
        }
    }
}

/// Error classification.
///
/// Every kind collapses to the same observable fallback (empty list or
/// absent reply); the kind exists for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Connection refused, timeout, TLS failure
    Network,
    /// Non-2xx response
    Status(u16),
    /// Body did not match the expected shape
    Decode,
    /// Base URL could not be turned into an endpoint
    InvalidUrl,
}

impl GatewayErrorKind {
    pub fn is_server_error(self) -> bool {
        matches!(self, Self::Status(code) if code >= 500)
    }
}
