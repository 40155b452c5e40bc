//! Static table of the Billboard charts this crate knows how to read.

use crate::models::{ChartMetadata, ChartType};

/// Billboard site root.
pub const BASE_URL: &str = "https://www.billboard.com";

/// Chart substituted for unknown names when fallback is enabled.
pub const DEFAULT_CHART: &str = "hot-100";

/// One known chart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownChart {
    /// Canonical chart identifier, e.g. `hot-100`.
    pub id: &'static str,
    /// URL path below [`BASE_URL`].
    pub path: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Selects the extraction routine and the item kind of every entry.
    pub chart_type: ChartType,
}

impl KnownChart {
    /// Metadata of this chart as served from `base_url`.
    pub fn metadata(&self, provider: &str, base_url: &str) -> ChartMetadata {
        ChartMetadata::new(provider, self.title, self.chart_type)
            .with_description(self.description)
            .with_url(format!("{}{}", base_url, self.path))
    }
}

pub const CHARTS: &[KnownChart] = &[
    KnownChart {
        id: "hot-100",
        path: "/charts/hot-100",
        title: "Billboard Hot 100",
        description: "The week's most popular songs across all genres, ranked by radio airplay, sales data, and streaming activity.",
        chart_type: ChartType::Single,
    },
    KnownChart {
        id: "billboard-200",
        path: "/charts/billboard-200",
        title: "Billboard 200",
        description: "The week's most popular albums across all genres, ranked by album sales and audio streaming.",
        chart_type: ChartType::Album,
    },
    KnownChart {
        id: "global-200",
        path: "/charts/global-200",
        title: "Global 200",
        description: "The week's most popular songs globally, ranked by streaming and sales activity.",
        chart_type: ChartType::Single,
    },
    KnownChart {
        id: "artist-100",
        path: "/charts/artist-100",
        title: "Artist 100",
        description: "The week's most popular artists",
        chart_type: ChartType::Single,
    },
    KnownChart {
        id: "streaming-songs",
        path: "/charts/streaming-songs",
        title: "Streaming Songs",
        description: "The most-streamed songs of the week",
        chart_type: ChartType::Single,
    },
    KnownChart {
        id: "radio-songs",
        path: "/charts/radio-songs",
        title: "Radio Songs",
        description: "The most-played songs on radio",
        chart_type: ChartType::Single,
    },
    KnownChart {
        id: "digital-song-sales",
        path: "/charts/digital-song-sales",
        title: "Digital Song Sales",
        description: "The best-selling digital songs",
        chart_type: ChartType::Single,
    },
];

/// Informal names accepted in place of chart identifiers.
const ALIASES: &[(&str, &str)] = &[
    ("hot 100", "hot-100"),
    ("billboard hot 100", "hot-100"),
    ("200", "billboard-200"),
    ("billboard 200", "billboard-200"),
    ("global", "global-200"),
    ("artist", "artist-100"),
];

/// Look up a chart by canonical identifier.
pub fn lookup(id: &str) -> Option<&'static KnownChart> {
    CHARTS.iter().find(|chart| chart.id == id)
}

/// Resolve a user supplied chart name.
///
/// Ignores case and surrounding whitespace, treats spaces and underscores
/// as hyphens and accepts the informal aliases.
pub fn resolve(name: &str) -> Option<&'static KnownChart> {
    let lower = name.trim().to_lowercase();
    let hyphenated = lower.replace([' ', '_'], "-");

    lookup(&lower).or_else(|| lookup(&hyphenated)).or_else(|| {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .and_then(|(_, id)| lookup(id))
    })
}

/// All canonical chart identifiers.
pub fn chart_ids() -> Vec<String> {
    CHARTS.iter().map(|chart| chart.id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_normalizes_names() {
        assert_eq!(resolve("hot-100").map(|s| s.id), Some("hot-100"));
        assert_eq!(resolve("Hot 100").map(|s| s.id), Some("hot-100"));
        assert_eq!(resolve("HOT_100").map(|s| s.id), Some("hot-100"));
        assert_eq!(resolve(" billboard 200 ").map(|s| s.id), Some("billboard-200"));
        assert_eq!(resolve("global").map(|s| s.id), Some("global-200"));
        assert!(resolve("invalid-chart-that-does-not-exist").is_none());
    }

    #[test]
    fn test_chart_types() {
        assert_eq!(lookup("billboard-200").unwrap().chart_type, ChartType::Album);
        assert_eq!(lookup("hot-100").unwrap().chart_type, ChartType::Single);
        assert_eq!(lookup("global-200").unwrap().chart_type, ChartType::Single);
        assert!(lookup(DEFAULT_CHART).is_some());
    }

    #[test]
    fn test_metadata_url() {
        let metadata = lookup("hot-100").unwrap().metadata("billboard", BASE_URL);
        assert_eq!(metadata.url(), "https://www.billboard.com/charts/hot-100");
        assert_eq!(metadata.title(), "Billboard Hot 100");
        assert_eq!(metadata.provider(), "billboard");
    }
}
