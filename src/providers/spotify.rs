//! Spotify chart provider.
//!
//! Registered so callers can discover it, but chart retrieval has not been
//! written yet: every fetch fails with `NotImplemented` and the chart list
//! is empty.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::config::{ProviderConfig, ProviderOptions};
use crate::error::{ChartError, Result};
use crate::models::{Chart, ChartMetadata};
use crate::providers::{Capabilities, Provider};

/// Placeholder Spotify provider.
#[derive(Debug, Clone)]
pub struct SpotifyProvider {
    config: ProviderConfig,
}

impl SpotifyProvider {
    /// Registry name.
    pub const NAME: &'static str = "spotify";

    /// Create the provider. Credentials and market are stored for the
    /// eventual API client.
    pub fn new(options: &ProviderOptions) -> Result<Self> {
        let config = ProviderConfig::from_options(options)?;
        debug!(
            "Spotify provider configured for market {} (credentials: {})",
            config.market,
            config.client_id.is_some()
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn market(&self) -> &str {
        &self.config.market
    }

    fn not_implemented(capability: &str) -> ChartError {
        ChartError::NotImplemented {
            provider: Self::NAME.to_string(),
            capability: capability.to_string(),
        }
    }
}

#[async_trait]
impl Provider for SpotifyProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::LATEST_AND_LIST
    }

    async fn get_latest(&self, _chart_name: &str) -> Result<Chart> {
        Err(Self::not_implemented("latest charts"))
    }

    async fn get_chart_by_date(&self, _chart_name: &str, _date: NaiveDate) -> Result<Chart> {
        Err(Self::not_implemented("historical charts"))
    }

    fn list_available_charts(&self) -> Result<Vec<ChartMetadata>> {
        Ok(Vec::new())
    }
}
