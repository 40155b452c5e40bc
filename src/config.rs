//! Provider configuration.
//!
//! Callers pass [`ProviderOptions`], where every field is optional and
//! unknown keys are ignored. Providers merge them over the documented
//! defaults into a validated [`ProviderConfig`].

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, Result};
use crate::http::RetryPolicy;

/// Default User-Agent sent with page requests.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTML tree construction mode.
///
/// Both modes use the same html5ever tree builder and produce the same
/// chart content; `Fragment` skips document-level recovery and is a little
/// cheaper on partial pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserBackend {
    #[default]
    Document,
    Fragment,
}

impl FromStr for ParserBackend {
    type Err = ChartError;

    /// Accepts the backend names plus the engine names used by other
    /// chart clients (`lxml`, `html5lib`, `html.parser`).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "html5ever" | "lxml" | "html5lib" => Ok(ParserBackend::Document),
            "fragment" | "html.parser" => Ok(ParserBackend::Fragment),
            other => Err(ChartError::InvalidConfig(format!(
                "unknown parser '{}'",
                other
            ))),
        }
    }
}

/// Caller-supplied options for one provider.
///
/// All fields are optional. Fields a provider does not use are ignored, as
/// are keys this struct does not know about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Per-request timeout in seconds.
    pub timeout: Option<f64>,
    /// Total number of fetch attempts.
    pub max_retries: Option<u32>,
    /// Delay before the second attempt, in seconds.
    pub retry_delay: Option<f64>,
    /// Double the delay after every failed attempt.
    pub retry_backoff: Option<bool>,
    pub user_agent: Option<String>,
    pub verify_ssl: Option<bool>,
    /// Proxy URL, e.g. `http://proxy.example.com:8080`.
    pub proxy: Option<String>,
    pub parser: Option<String>,
    pub include_images: Option<bool>,
    /// Keep only this many leading entries; absent or null means no limit.
    pub max_chart_entries: Option<u64>,
    /// Substitute the default chart for unknown chart names.
    pub fallback_to_default: Option<bool>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Market/region code, e.g. `US`.
    pub market: Option<String>,
}

/// Validated provider configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub retry_backoff: bool,
    pub user_agent: String,
    pub verify_ssl: bool,
    pub proxy: Option<String>,
    pub parser: ParserBackend,
    pub include_images: bool,
    pub max_chart_entries: Option<usize>,
    pub fallback_to_default: bool,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub market: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            retry_backoff: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verify_ssl: true,
            proxy: None,
            parser: ParserBackend::default(),
            include_images: true,
            max_chart_entries: None,
            fallback_to_default: true,
            client_id: None,
            client_secret: None,
            market: "US".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Merge options over the defaults.
    pub fn from_options(options: &ProviderOptions) -> Result<Self> {
        Self::default().merge(options)
    }

    /// Merge options over this configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a non-positive or non-finite `timeout`, a
    /// negative `retry_delay`, or `max_chart_entries == 0`.
    pub fn merge(mut self, options: &ProviderOptions) -> Result<Self> {
        if let Some(timeout) = options.timeout {
            if !timeout.is_finite() || timeout <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "timeout must be a positive number of seconds, got {}",
                    timeout
                )));
            }
            self.timeout = Duration::from_secs_f64(timeout);
        }
        if let Some(max_retries) = options.max_retries {
            self.max_retries = max_retries;
        }
        if let Some(delay) = options.retry_delay {
            if !delay.is_finite() || delay < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "retry_delay must be a non-negative number of seconds, got {}",
                    delay
                )));
            }
            self.retry_delay = Duration::from_secs_f64(delay);
        }
        if let Some(backoff) = options.retry_backoff {
            self.retry_backoff = backoff;
        }
        if let Some(user_agent) = &options.user_agent {
            self.user_agent = user_agent.clone();
        }
        if let Some(verify_ssl) = options.verify_ssl {
            self.verify_ssl = verify_ssl;
        }
        if let Some(proxy) = &options.proxy {
            self.proxy = Some(proxy.clone()).filter(|p| !p.is_empty());
        }
        if let Some(parser) = &options.parser {
            self.parser = match parser.parse() {
                Ok(backend) => backend,
                Err(_) => {
                    warn!("Parser '{}' is not available, falling back to document", parser);
                    ParserBackend::Document
                }
            };
        }
        if let Some(include_images) = options.include_images {
            self.include_images = include_images;
        }
        if let Some(max) = options.max_chart_entries {
            if max == 0 {
                return Err(ChartError::InvalidConfig(
                    "max_chart_entries must be positive".to_string(),
                ));
            }
            self.max_chart_entries = Some(usize::try_from(max).unwrap_or(usize::MAX));
        }
        if let Some(fallback) = options.fallback_to_default {
            self.fallback_to_default = fallback;
        }
        if let Some(client_id) = &options.client_id {
            self.client_id = Some(client_id.clone());
        }
        if let Some(client_secret) = &options.client_secret {
            self.client_secret = Some(client_secret.clone());
        }
        if let Some(market) = &options.market {
            self.market = market.clone();
        }
        Ok(self)
    }

    /// Retry policy of the page fetch loop.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.max(1),
            delay: self.retry_delay,
            backoff: self.retry_backoff,
        }
    }
}

/// Options for every provider, keyed by provider name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientConfig {
    providers: HashMap<String, ProviderOptions>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON document such as
    /// `{"billboard": {"timeout": 60, "include_images": false}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the options of one provider.
    pub fn with_provider<S: Into<String>>(mut self, provider: S, options: ProviderOptions) -> Self {
        self.providers.insert(provider.into(), options);
        self
    }

    /// Options of one provider, empty when none were given.
    pub fn options(&self, provider: &str) -> ProviderOptions {
        self.providers.get(provider).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(config.include_images);
        assert!(config.fallback_to_default);
        assert_eq!(config.max_chart_entries, None);
        assert_eq!(config.parser, ParserBackend::Document);
    }

    #[test]
    fn test_merge_overrides() {
        let options = ProviderOptions {
            timeout: Some(60.0),
            include_images: Some(false),
            max_chart_entries: Some(10),
            ..Default::default()
        };
        let config = ProviderConfig::from_options(&options).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(!config.include_images);
        assert_eq!(config.max_chart_entries, Some(10));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_merge_rejects_out_of_range() {
        let bad_timeout = ProviderOptions {
            timeout: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            ProviderConfig::from_options(&bad_timeout),
            Err(ChartError::InvalidConfig(_))
        ));

        let bad_limit = ProviderOptions {
            max_chart_entries: Some(0),
            ..Default::default()
        };
        assert!(ProviderConfig::from_options(&bad_limit).is_err());

        let bad_delay = ProviderOptions {
            retry_delay: Some(-1.0),
            ..Default::default()
        };
        assert!(ProviderConfig::from_options(&bad_delay).is_err());
    }

    #[test]
    fn test_unknown_parser_falls_back() {
        let options = ProviderOptions {
            parser: Some("quick-xml".to_string()),
            ..Default::default()
        };
        let config = ProviderConfig::from_options(&options).unwrap();
        assert_eq!(config.parser, ParserBackend::Document);

        let options = ProviderOptions {
            parser: Some("html.parser".to_string()),
            ..Default::default()
        };
        let config = ProviderConfig::from_options(&options).unwrap();
        assert_eq!(config.parser, ParserBackend::Fragment);
    }

    #[test]
    fn test_client_config_ignores_unknown_keys() {
        let config = ClientConfig::from_json(
            r#"{"billboard": {"timeout": 45, "enable_cache": true, "max_chart_entries": null}}"#,
        )
        .unwrap();
        let options = config.options("billboard");
        assert_eq!(options.timeout, Some(45.0));
        assert_eq!(options.max_chart_entries, None);
        assert_eq!(config.options("spotify"), ProviderOptions::default());
    }

    #[test]
    fn test_retry_policy_has_at_least_one_attempt() {
        let options = ProviderOptions {
            max_retries: Some(0),
            ..Default::default()
        };
        let config = ProviderConfig::from_options(&options).unwrap();
        assert_eq!(config.retry_policy().max_attempts, 1);
    }
}
