//! Image fetch error types.

use thiserror::Error;

use super::TransportError;

/// Terminal failure of an image fetch.
///
/// `Clone` because one outcome is delivered to every waiter on a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ImageError {
    #[error("invalid image url: {reason}")]
    InvalidUrl { reason: String },

    #[error("image transport failure: {message}")]
    Transport { message: String },

    #[error("image decode failure: {message}")]
    Decode { message: String },
}

impl ImageError {
    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns whether a later retry may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<TransportError> for ImageError {
    fn from(err: TransportError) -> Self {
        Self::transport(err.to_string())
    }
}
