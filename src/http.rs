//! Page transport.
//!
//! Providers never talk to `reqwest` directly. They hold a [`Fetcher`],
//! which makes testing with scripted responses possible, and run every
//! request through [`fetch_with_retry`].

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{ChartError, FetchError, Result};

/// A single page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub timeout: Duration,
}

/// A successful page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP fetch capability used by providers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page. Non-success statuses are reported as
    /// [`FetchError::Status`].
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<FetchResponse, FetchError>;

    /// Release the underlying session. Must be idempotent.
    fn close(&self) {}
}

/// `reqwest` backed fetcher holding one keep-alive session.
#[derive(Debug)]
pub struct HttpFetcher {
    client: Mutex<Option<Client>>,
}

impl HttpFetcher {
    /// Build the session from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the proxy URL is malformed or the client
    /// cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .cookie_store(true)
            .danger_accept_invalid_certs(!config.verify_ssl);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|e| {
                ChartError::InvalidConfig(format!("invalid proxy '{}': {}", proxy, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ChartError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Mutex::new(Some(client)),
        })
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<FetchResponse, FetchError> {
        let client = self
            .client
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(FetchError::Closed)?;

        debug!("GET {}", request.url);
        let response = client
            .get(&request.url)
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn close(&self) {
        let mut client = self.client.lock().unwrap_or_else(|e| e.into_inner());
        if client.take().is_some() {
            debug!("HTTP session closed");
        }
    }
}

/// Bounded retry policy of the page fetch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub delay: Duration,
    /// Double the delay after every failed attempt.
    pub backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            backoff: true,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.backoff {
            let factor = 1u32 << attempt.saturating_sub(1).min(16);
            self.delay.saturating_mul(factor)
        } else {
            self.delay
        }
    }
}

/// Fetch outcome after the retry budget ran out.
#[derive(Debug)]
pub struct RetriesExhausted {
    pub attempts: u32,
    pub error: FetchError,
}

/// Fetch a page, retrying transient failures.
///
/// Makes at most `policy.max_attempts` attempts. Errors that are not
/// retryable end the loop early.
pub async fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    request: &FetchRequest,
    policy: &RetryPolicy,
) -> std::result::Result<FetchResponse, RetriesExhausted> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match fetcher.fetch(request).await {
            Ok(response) => {
                if attempt > 1 {
                    debug!("Fetched {} on attempt {}", request.url, attempt);
                }
                return Ok(response);
            }
            Err(error) if error.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                    attempt, max_attempts, request.url, error, delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(error) => {
                return Err(RetriesExhausted {
                    attempts: attempt,
                    error,
                })
            }
        }
    }
}
