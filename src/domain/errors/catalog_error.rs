//! Catalogue client error types.

use std::fmt;

use thiserror::Error;

use super::TransportError;

/// Non-success HTTP status returned by the metadata API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpFailure {
    /// 401: the bearer token was rejected.
    Unauthorized,
    /// Any other non-2xx status.
    Status(u16),
}

impl HttpFailure {
    /// Classifies a non-success status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            other => Self::Status(other),
        }
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn status(self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::Status(status) => status,
        }
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "HTTP 401: unauthorized, check the API token"),
            Self::Status(status) => write!(f, "HTTP {status}"),
        }
    }
}

/// Catalogue error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CatalogError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("http failure: {0}")]
    Http(HttpFailure),

    #[error("missing data: {what}")]
    MissingData { what: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    /// Creates invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates missing data error.
    #[must_use]
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingData { what: what.into() }
    }

    /// Creates HTTP failure from a status code.
    #[must_use]
    pub const fn http(status: u16) -> Self {
        Self::Http(HttpFailure::from_status(status))
    }

    /// Returns whether the token was rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http(HttpFailure::Unauthorized))
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http(HttpFailure::Status(status)) => *status == 429 || *status >= 500,
            Self::Http(HttpFailure::Unauthorized)
            | Self::InvalidInput { .. }
            | Self::MissingData { .. }
            | Self::Decode(_) => false,
        }
    }
}
