//! Chart data providers.
//!
//! Every source implements [`Provider`]. The facade only talks to this
//! trait and consults [`Capabilities`] before dispatching, so adding a
//! source never touches the client.
//!
//! - [`BillboardProvider`]: scrapes billboard.com chart pages
//! - [`SpotifyProvider`]: registered placeholder, not implemented yet

pub mod billboard;
pub mod spotify;

pub use billboard::BillboardProvider;
pub use spotify::SpotifyProvider;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Chart, ChartMetadata};

/// A single provider capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Fetch the latest edition of a chart.
    Latest,
    /// Fetch the edition of a chart published on a given date.
    Historical,
    /// Enumerate the known charts.
    ListCharts,
    /// Search charts.
    Search,
}

/// Static capability record of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub latest: bool,
    pub historical: bool,
    pub list_charts: bool,
    pub search: bool,
}

impl Capabilities {
    /// Every capability.
    pub const ALL: Capabilities = Capabilities {
        latest: true,
        historical: true,
        list_charts: true,
        search: true,
    };

    /// Latest charts and chart listing only.
    pub const LATEST_AND_LIST: Capabilities = Capabilities {
        latest: true,
        historical: false,
        list_charts: true,
        search: false,
    };

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Latest => self.latest,
            Capability::Historical => self.historical,
            Capability::ListCharts => self.list_charts,
            Capability::Search => self.search,
        }
    }
}

/// Fetch-and-normalize contract of a chart source.
///
/// Implementations must be cheap to call repeatedly: every call builds a
/// fresh [`Chart`], nothing is cached.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Registry name, e.g. `billboard`.
    fn name(&self) -> &str;

    /// Static capability record.
    fn capabilities(&self) -> Capabilities;

    /// Check a single capability.
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().supports(capability)
    }

    /// Fetch, parse and normalize the latest edition of a chart.
    ///
    /// # Errors
    ///
    /// - `UnknownChart` if the name is not recognized and no fallback applies
    /// - `FetchFailure` once the retry budget is spent
    /// - `ParseFailure` if the page no longer has the expected shape
    async fn get_latest(&self, chart_name: &str) -> Result<Chart>;

    /// Fetch the edition of a chart published on `date`.
    ///
    /// Providers without the historical capability fail with
    /// `NotSupported` before doing any network work.
    async fn get_chart_by_date(&self, chart_name: &str, date: NaiveDate) -> Result<Chart>;

    /// Enumerate every chart the provider recognizes.
    fn list_available_charts(&self) -> Result<Vec<ChartMetadata>>;

    /// Release held sessions. Idempotent.
    fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_supports() {
        let caps = Capabilities::LATEST_AND_LIST;
        assert!(caps.supports(Capability::Latest));
        assert!(caps.supports(Capability::ListCharts));
        assert!(!caps.supports(Capability::Historical));
        assert!(!caps.supports(Capability::Search));
        assert!(Capabilities::ALL.supports(Capability::Historical));
        assert!(!Capabilities::default().supports(Capability::Latest));
    }
}
