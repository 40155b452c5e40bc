//! Billboard chart provider.
//!
//! Fetches a chart page from billboard.com, extracts the ranked rows and
//! normalizes them into a [`Chart`]. Only the latest edition of a chart is
//! available.

pub mod catalog;
pub mod parser;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::{ProviderConfig, ProviderOptions};
use crate::error::{ChartError, Result};
use crate::http::{fetch_with_retry, FetchRequest, Fetcher, HttpFetcher};
use crate::models::{Album, Chart, ChartEntry, ChartMetadata, ChartType, EntryStats, Song};
use crate::providers::{Capabilities, Provider};

use catalog::{KnownChart, BASE_URL, CHARTS, DEFAULT_CHART};
use parser::{ChartPageParser, ParsedPage, RawRow};

/// Billboard scraping provider.
///
/// # Example
///
/// ```rust,no_run
/// use mchart::config::ProviderOptions;
/// use mchart::providers::{BillboardProvider, Provider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let billboard = BillboardProvider::new(&ProviderOptions::default())?;
///     let chart = billboard.get_latest("hot-100").await?;
///     for entry in chart.top(10) {
///         println!("{:>3}. {} - {}", entry.rank(), entry.title(), entry.artist());
///     }
///     Ok(())
/// }
/// ```
pub struct BillboardProvider {
    config: ProviderConfig,
    fetcher: Arc<dyn Fetcher>,
    parser: ChartPageParser,
    base_url: String,
}

impl std::fmt::Debug for BillboardProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillboardProvider")
            .field("config", &self.config)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BillboardProvider {
    /// Registry name.
    pub const NAME: &'static str = "billboard";

    /// Create a provider with caller options merged over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if an option is out of range or the HTTP
    /// session cannot be built.
    pub fn new(options: &ProviderOptions) -> Result<Self> {
        Self::with_config(ProviderConfig::from_options(options)?)
    }

    /// Create a provider from an already validated configuration.
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        Self::with_fetcher(config, fetcher)
    }

    /// Create a provider that loads pages through `fetcher`.
    pub fn with_fetcher(config: ProviderConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let parser = ChartPageParser::new(config.parser, config.include_images)?;
        Ok(Self {
            config,
            fetcher,
            parser,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Serve chart pages from another site root, e.g. a mirror.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Map a chart name to a known chart, substituting the default chart
    /// when fallback is enabled.
    fn resolve_chart(&self, chart_name: &str) -> Result<&'static KnownChart> {
        if let Some(target) = catalog::resolve(chart_name) {
            return Ok(target);
        }

        if self.config.fallback_to_default {
            if let Some(target) = catalog::lookup(DEFAULT_CHART) {
                warn!(
                    "Unknown Billboard chart '{}', falling back to '{}'",
                    chart_name, DEFAULT_CHART
                );
                return Ok(target);
            }
        }

        Err(ChartError::UnknownChart {
            provider: Self::NAME.to_string(),
            chart: chart_name.to_string(),
            available: catalog::chart_ids(),
        })
    }

    fn chart_url(&self, target: &KnownChart) -> String {
        format!("{}{}", self.base_url, target.path)
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let request = FetchRequest {
            url: url.to_string(),
            timeout: self.config.timeout,
        };

        let response = fetch_with_retry(self.fetcher.as_ref(), &request, &self.config.retry_policy())
            .await
            .map_err(|exhausted| ChartError::FetchFailure {
                provider: Self::NAME.to_string(),
                url: url.to_string(),
                attempts: exhausted.attempts,
                source: exhausted.error,
            })?;

        debug!("Fetched {} ({} bytes)", url, response.body.len());
        Ok(response.body)
    }

    /// Build one entry from a parsed row.
    fn build_entry(&self, row: RawRow, chart_type: ChartType) -> Result<ChartEntry> {
        let stats = EntryStats::new(row.rank)
            .with_weeks_on_chart(row.weeks_on_chart)
            .with_last_week(row.last_week)
            .with_peak_position(row.peak_position);

        match chart_type {
            ChartType::Single => {
                let mut song = Song::new(row.title, row.artist).with_artists(row.artists);
                if let Some(image) = row.image {
                    song = song.with_image(image);
                }
                ChartEntry::with_song(stats, song)
            }
            ChartType::Album => {
                let mut album = Album::new(row.title, row.artist).with_artists(row.artists);
                if let Some(image) = row.image {
                    album = album.with_image(image);
                }
                ChartEntry::with_album(stats, album)
            }
        }
    }

    /// Turn a parsed page into a chart.
    fn assemble_chart(&self, target: &KnownChart, page: ParsedPage) -> Result<Chart> {
        let parse_failure = |reason: String| ChartError::ParseFailure {
            provider: Self::NAME.to_string(),
            chart: target.id.to_string(),
            reason,
        };

        if page.total_rows == 0 {
            return Err(parse_failure("no chart rows found on page".to_string()));
        }

        let mut entries = Vec::with_capacity(page.rows.len());
        for row in page.rows {
            let rank = row.rank;
            match self.build_entry(row, target.chart_type) {
                Ok(entry) => entries.push(entry),
                Err(e) => debug!("Skipping entry at rank {}: {}", rank, e),
            }
        }
        entries.sort_by_key(ChartEntry::rank);

        if let Some(max) = self.config.max_chart_entries {
            entries.truncate(max);
        }

        if entries.is_empty() {
            return Err(parse_failure(format!(
                "none of the {} chart rows could be parsed",
                page.total_rows
            )));
        }

        let published_date = match page.published_date {
            Some(date) => date,
            None => {
                let today = Local::now().date_naive();
                warn!(
                    "No publication date found for Billboard chart '{}', using {}",
                    target.id, today
                );
                today
            }
        };

        let skipped = page.total_rows.saturating_sub(entries.len());
        let chart = Chart::new(
            target.metadata(Self::NAME, &self.base_url),
            published_date,
            entries,
        )?;

        info!(
            "Parsed Billboard chart '{}' for {}: {} entries ({} rows skipped or truncated)",
            target.id,
            published_date,
            chart.total_entries(),
            skipped
        );
        Ok(chart)
    }
}

#[async_trait]
impl Provider for BillboardProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::LATEST_AND_LIST
    }

    async fn get_latest(&self, chart_name: &str) -> Result<Chart> {
        let target = self.resolve_chart(chart_name)?;
        let url = self.chart_url(target);
        info!("Fetching Billboard chart '{}' from {}", target.id, url);

        let html = self.fetch_page(&url).await?;
        let page = self.parser.parse(&html, target.chart_type);
        self.assemble_chart(target, page)
    }

    async fn get_chart_by_date(&self, _chart_name: &str, _date: NaiveDate) -> Result<Chart> {
        Err(ChartError::NotSupported {
            provider: Self::NAME.to_string(),
            operation: "historical charts".to_string(),
        })
    }

    fn list_available_charts(&self) -> Result<Vec<ChartMetadata>> {
        Ok(CHARTS
            .iter()
            .map(|target| target.metadata(Self::NAME, &self.base_url))
            .collect())
    }

    fn close(&self) {
        self.fetcher.close();
    }
}
