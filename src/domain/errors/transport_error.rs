//! HTTP transport error types.

use thiserror::Error;

/// Network-layer failures reported by an [`HttpTransport`](crate::domain::ports::HttpTransport).
///
/// Cancellation is not represented here: dropping the request future is the
/// cancellation primitive and produces no outcome at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("failed to connect: {message}")]
    Connect { message: String },

    #[error("request failed: {message}")]
    Other { message: String },
}

impl TransportError {
    /// Creates connect error.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Creates generic transport error.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
