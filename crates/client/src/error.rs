//! Fetch failure taxonomy.

use std::time::Duration;

/// Every way a product fetch can fail, normalized.
///
/// All variants are recoverable by a user-triggered reload except
/// [`FetchError::Client`], which retrying cannot fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// No response reached us (connection refused, DNS, reset...).
    #[error("network error - no response from server: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// 5xx, reported once the retry budget is spent.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// 4xx; never retried.
    #[error("client error ({status}): {message}")]
    Client { status: u16, message: String },
    /// Body is not the expected JSON shape, or a record fails validation.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Failures worth an automatic retry: network errors and 5xx.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Server { .. })
    }

    /// Whether the UI should offer a "try again" affordance.
    pub fn user_can_retry(&self) -> bool {
        !matches!(self, FetchError::Client { .. })
    }

    /// Stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Timeout(_) => "timeout",
            FetchError::Server { .. } => "server",
            FetchError::Client { .. } => "client",
            FetchError::MalformedResponse(_) => "malformed_response",
        }
    }
}
