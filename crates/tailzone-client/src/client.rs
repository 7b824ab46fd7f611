//! Status API client implementation.

use crate::source::StatusSource;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tailzone_core::{Result, Status, StatusError};
use tracing::{debug, warn};
use url::Url;

/// Default status endpoint of a locally running node agent
pub const DEFAULT_STATUS_URL: &str = "http://127.0.0.1:41112/localapi/v0/status";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the peer status API
#[derive(Clone)]
pub struct StatusClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    url: Url,
}

impl StatusClient {
    /// Create a client for the given status URL using default settings
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        StatusClientBuilder::new().url(url.as_ref()).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> StatusClientBuilder {
        StatusClientBuilder::new()
    }

    /// The endpoint this client polls
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Fetch the current peer status
    pub async fn fetch(&self) -> Result<Status> {
        debug!(url = %self.inner.url, "GET status");

        let response = self
            .inner
            .http
            .get(self.inner.url.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            warn!(code = status.as_u16(), "status API returned an error");
            return Err(StatusError::Api {
                code: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(StatusError::Json)
    }
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn status(&self) -> Result<Status> {
        self.fetch().await
    }
}

/// Sort a reqwest failure into the matching error variant
fn map_transport_error(err: reqwest::Error) -> StatusError {
    if err.is_timeout() {
        StatusError::Timeout(err.to_string())
    } else if err.is_connect() {
        StatusError::Connection(err.to_string())
    } else {
        StatusError::Http(err.to_string())
    }
}

/// Builder for configuring a [`StatusClient`]
pub struct StatusClientBuilder {
    url: String,
    timeout: Duration,
    user_agent: String,
}

impl StatusClientBuilder {
    /// Create a new builder pointed at [`DEFAULT_STATUS_URL`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: DEFAULT_STATUS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("tailzone/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the status URL
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<StatusClient> {
        let url = Url::parse(&self.url)
            .map_err(|e| StatusError::InvalidUrl(format!("{}: {e}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StatusError::InvalidUrl(format!(
                "{}: unsupported scheme {:?}",
                self.url,
                url.scheme()
            )));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| StatusError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(StatusClient {
            inner: Arc::new(ClientInner { http, url }),
        })
    }
}

impl Default for StatusClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
