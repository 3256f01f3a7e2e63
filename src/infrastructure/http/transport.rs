//! reqwest-backed HTTP transport.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{trace, warn};

use crate::domain::errors::TransportError;
use crate::domain::ports::{HttpRequest, HttpResponse, HttpTransport};

const USER_AGENT: &str = concat!("cinefeed/", env!("CARGO_PKG_VERSION"));

/// HTTP transport over a pooled [`reqwest::Client`].
///
/// Dropping an in-flight `get` future aborts the underlying connection.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default user agent.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn map_error(err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::connect(err.to_string())
        } else {
            TransportError::other(err.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        trace!(url = %request.url, "Sending GET request");

        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "HTTP request failed");
            Self::map_error(&e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "Failed to read response body");
            Self::map_error(&e)
        })?;

        trace!(url = %request.url, status, bytes = body.len(), "Received response");

        Ok(HttpResponse { status, body })
    }
}
