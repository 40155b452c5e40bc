//! The `MChart` facade.
//!
//! Holds one instance of every provider keyed by name, routes requests to
//! them, checks capabilities before dispatching, and converts results into
//! the representation the caller asked for.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::converters::{ChartData, ReturnType};
use crate::error::{ChartError, Result};
use crate::models::{Chart, ChartMetadata};
use crate::providers::{BillboardProvider, Capability, Provider, SpotifyProvider};

/// Unified chart client.
///
/// # Example
///
/// ```rust,no_run
/// use mchart::{MChart, ReturnType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = MChart::new()?;
///
///     let chart = client.get_chart("billboard", "hot-100", ReturnType::Model).await?;
///     if let Some(chart) = chart.as_model() {
///         for entry in chart.top(5) {
///             println!("{}. {} - {}", entry.rank(), entry.title(), entry.artist());
///         }
///     }
///
///     let dict = client.get_chart("billboard", "billboard-200", ReturnType::Dict).await?;
///     println!("{}", dict.into_dict()?);
///     Ok(())
/// }
/// ```
pub struct MChart {
    providers: BTreeMap<String, Box<dyn Provider>>,
    closed: bool,
}

impl std::fmt::Debug for MChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MChart")
            .field("providers", &self.providers())
            .field("closed", &self.closed)
            .finish()
    }
}

impl MChart {
    /// Create a client with default options for every provider.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a provider's HTTP session cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with per-provider options.
    ///
    /// Providers without an entry in `config` use the defaults.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut client = Self::empty();
        client.register(Box::new(BillboardProvider::new(
            &config.options(BillboardProvider::NAME),
        )?));
        client.register(Box::new(SpotifyProvider::new(
            &config.options(SpotifyProvider::NAME),
        )?));
        Ok(client)
    }

    /// Create a client without any provider.
    pub fn empty() -> Self {
        Self {
            providers: BTreeMap::new(),
            closed: false,
        }
    }

    /// Register a provider under its own name, replacing and closing any
    /// provider previously registered under that name.
    ///
    /// Registering reopens a closed client, so the next [`close`](Self::close)
    /// or drop closes the new provider too.
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        let name = provider.name().to_string();
        debug!("Registering provider '{}'", name);
        if let Some(previous) = self.providers.insert(name, provider) {
            previous.close();
        }
        self.closed = false;
    }

    /// Names of the registered providers, sorted.
    pub fn providers(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    /// Look up a provider by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` listing the registered names.
    pub fn get_provider(&self, name: &str) -> Result<&dyn Provider> {
        self.providers
            .get(name)
            .map(|p| p.as_ref())
            .ok_or_else(|| ChartError::UnknownProvider {
                provider: name.to_string(),
                available: self.providers(),
            })
    }

    /// Whether the named provider has `capability`.
    pub fn supports(&self, provider: &str, capability: Capability) -> Result<bool> {
        Ok(self.get_provider(provider)?.supports(capability))
    }

    /// Fetch the latest edition of a chart.
    ///
    /// # Errors
    ///
    /// Propagates `UnknownProvider` and whatever the provider reports.
    pub async fn get_chart(
        &self,
        provider: &str,
        chart: &str,
        return_type: ReturnType,
    ) -> Result<ChartData<Chart>> {
        let source = self.get_provider(provider)?;
        info!("Getting chart '{}' from {}", chart, provider);
        let chart = source.get_latest(chart).await?;
        ChartData::convert(chart, return_type)
    }

    /// Fetch the edition of a chart published on `date`.
    ///
    /// Providers without the historical capability fail with
    /// `NotSupported` before any network work.
    pub async fn get_chart_by_date(
        &self,
        provider: &str,
        chart: &str,
        date: NaiveDate,
        return_type: ReturnType,
    ) -> Result<ChartData<Chart>> {
        let source = self.get_provider(provider)?;
        if !source.supports(Capability::Historical) {
            return Err(ChartError::NotSupported {
                provider: provider.to_string(),
                operation: "historical charts".to_string(),
            });
        }

        info!("Getting chart '{}' for {} from {}", chart, date, provider);
        let chart = source.get_chart_by_date(chart, date).await?;
        ChartData::convert(chart, return_type)
    }

    /// List the charts of one provider.
    pub fn list_charts(
        &self,
        provider: &str,
        return_type: ReturnType,
    ) -> Result<ChartData<Vec<ChartMetadata>>> {
        let charts = self.get_provider(provider)?.list_available_charts()?;
        ChartData::convert(charts, return_type)
    }

    /// List the charts of every provider, keyed by provider name.
    pub fn list_all_charts(
        &self,
        return_type: ReturnType,
    ) -> Result<BTreeMap<String, ChartData<Vec<ChartMetadata>>>> {
        self.providers
            .keys()
            .map(|name| Ok((name.clone(), self.list_charts(name, return_type)?)))
            .collect()
    }

    /// Close every provider. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        for provider in self.providers.values() {
            provider.close();
        }
        self.closed = true;
        debug!("Closed {} providers", self.providers.len());
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for MChart {
    fn drop(&mut self) {
        self.close();
    }
}
