//! Logging setup for host applications

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "chat_sync=info";

/// Install a JSON subscriber filtered by `RUST_LOG`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init() {
    if let Err(e) = try_init() {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}

/// Install a JSON subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn try_init() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .try_init()
}
