//! Mock transport for testing without a live platform.
//!
//! [`MockTransport`] implements the [`Transport`] trait over a scripted
//! URL → response map, so engine and reader code can be exercised against
//! arbitrary response trees.
//!
//! # Features
//!
//! - **Failure injection**: script a transport error for any URL
//! - **Latency simulation**: per-URL delays to force arrival interleavings
//! - **Request log**: assert which URLs were fetched, and how often

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::transport::{Transport, TransportError};

#[derive(Debug, Clone)]
struct Scripted {
    outcome: Result<String, String>,
    delay: Duration,
}

/// A scripted [`Transport`] for tests.
///
/// # Example
///
/// ```
/// use lorawatch_core::mock::MockTransport;
/// use lorawatch_core::Transport;
///
/// #[tokio::main]
/// async fn main() {
///     let transport = MockTransport::new();
///     transport.respond("https://x/ping", "pong");
///
///     let body = transport.get("https://x/ping").await.unwrap();
///     assert_eq!(body, "pong");
///     assert_eq!(transport.request_count(), 1);
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Scripted>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response body for a URL.
    pub fn respond(&self, url: &str, body: &str) {
        self.respond_after(url, body, Duration::ZERO);
    }

    /// Script a successful response delivered after `delay`.
    pub fn respond_after(&self, url: &str, body: &str, delay: Duration) {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Scripted {
                outcome: Ok(body.to_string()),
                delay,
            },
        );
    }

    /// Script a transport failure for a URL.
    pub fn fail(&self, url: &str, message: &str) {
        self.fail_after(url, message, Duration::ZERO);
    }

    /// Script a transport failure delivered after `delay`.
    pub fn fail_after(&self, url: &str, message: &str, delay: Duration) {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Scripted {
                outcome: Err(message.to_string()),
                delay,
            },
        );
    }

    /// Every URL fetched so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        let scripted = self.routes.lock().unwrap().get(url).cloned();

        let Some(scripted) = scripted else {
            return Err(TransportError::Failed {
                url: url.to_string(),
                message: "no scripted response".to_string(),
            });
        };

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }

        scripted.outcome.map_err(|message| TransportError::Failed {
            url: url.to_string(),
            message,
        })
    }
}
