//! Error types for chart operations.

use thiserror::Error;

/// Main error type for all chart operations.
///
/// Every variant names the step that failed, so callers can branch on the
/// kind instead of inspecting messages.
#[derive(Debug, Error)]
pub enum ChartError {
    /// No provider is registered under this name.
    #[error("Unknown provider '{provider}', available: {available:?}")]
    UnknownProvider {
        provider: String,
        available: Vec<String>,
    },

    /// The provider does not recognize the chart name and no fallback applies.
    #[error("Unknown chart '{chart}' for provider '{provider}', available: {available:?}")]
    UnknownChart {
        provider: String,
        chart: String,
        available: Vec<String>,
    },

    /// The provider lacks the capability required by the operation.
    #[error("Provider '{provider}' does not support {operation}")]
    NotSupported { provider: String, operation: String },

    /// The provider declares the operation but has no implementation yet.
    #[error("Provider '{provider}' has not implemented {capability}")]
    NotImplemented { provider: String, capability: String },

    /// The page could not be fetched within the retry budget.
    #[error("Failed to fetch {url} for provider '{provider}' after {attempts} attempt(s): {source}")]
    FetchFailure {
        provider: String,
        url: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    /// The page was fetched but its structure did not yield a chart.
    #[error("Failed to parse chart '{chart}' from provider '{provider}': {reason}")]
    ParseFailure {
        provider: String,
        chart: String,
        reason: String,
    },

    /// An entity invariant was violated at construction.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Conversion to or from the plain map representation failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Transport-level failure of a single page fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed in the client.
    #[error("Request error: {0}")]
    Request(#[source] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The session was closed before the request was made.
    #[error("HTTP session is closed")]
    Closed,
}

impl From<reqwest::Error> for FetchError {
    /// Timeouts and dropped connections get their own variants, including
    /// a connection lost while the body is read.
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() || e.is_body() || e.is_decode() {
            FetchError::Connection(e.to_string())
        } else {
            FetchError::Request(e)
        }
    }
}

impl FetchError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.is_body()
                    || e.is_decode()
                    || e.status().is_some()
            }
            FetchError::Status(_) | FetchError::Timeout | FetchError::Connection(_) => true,
            FetchError::Closed => false,
        }
    }
}

/// Result type alias for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_retryable() {
        assert!(FetchError::Status(503).is_retryable());
        assert!(FetchError::Status(404).is_retryable());
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::Connection("reset".to_string()).is_retryable());
        assert!(!FetchError::Closed.is_retryable());
    }

    #[test]
    fn test_fetch_failure_message() {
        let err = ChartError::FetchFailure {
            provider: "billboard".to_string(),
            url: "https://www.billboard.com/charts/hot-100".to_string(),
            attempts: 3,
            source: FetchError::Status(502),
        };
        let msg = err.to_string();
        assert!(msg.contains("after 3 attempt(s)"));
        assert!(msg.contains("HTTP status 502"));
    }
}
