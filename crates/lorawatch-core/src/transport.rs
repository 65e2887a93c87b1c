//! Outbound HTTP gateway to the telemetry platform.

use async_trait::async_trait;
use tracing::debug;

use crate::config::ConnectionConfig;

/// One-shot GET against the telemetry platform.
///
/// Exactly one of body / error is produced per call, exactly once.
/// Implementations do not retry and do not enforce a timeout: a hung remote
/// call hangs its branch of the fetch tree.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for the fully-formed URL and return the raw body.
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The platform is not reachable.
    #[error("Service not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read.
    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The configured proxy URL is invalid.
    #[error("Invalid proxy URL '{proxy}': {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(reqwest::Error),

    /// Request failure reported by a non-HTTP transport.
    #[error("Request failed for {url}: {message}")]
    Failed { url: String, message: String },
}

/// reqwest-backed transport with optional proxy routing.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport, routing every request through `proxy` when set.
    pub fn new(proxy: Option<&str>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy) = proxy {
            let proxy_rule =
                reqwest::Proxy::all(proxy).map_err(|e| TransportError::InvalidProxy {
                    proxy: proxy.to_string(),
                    source: e,
                })?;
            builder = builder.proxy(proxy_rule);
        }
        let client = builder.build().map_err(TransportError::Build)?;
        Ok(Self { client })
    }

    /// Build a transport from connection settings.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self, TransportError> {
        Self::new(config.proxy.as_deref())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        debug!("requesting: {url}");
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| TransportError::NotReachable {
                    url: url.to_string(),
                    source: e,
                })?;

        // Platform errors arrive in-band via the response envelope, so the
        // HTTP status is not inspected here.
        let body = response.text().await.map_err(|e| TransportError::Body {
            url: url.to_string(),
            source: e,
        })?;
        debug!("response: {url}");
        Ok(body)
    }
}
