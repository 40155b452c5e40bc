//! Chart and chart metadata models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{contains_ignore_case, ChartType};
use super::entry::ChartEntry;
use crate::converters;
use crate::error::{ChartError, Result};

/// Descriptive data of a chart, independent of any edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMetadata {
    /// Provider identifier, e.g. `billboard`.
    provider: String,

    title: String,

    #[serde(default)]
    description: String,

    /// Source page URL.
    #[serde(default)]
    url: String,

    /// Kind of item every entry of the chart carries.
    #[serde(rename = "type")]
    chart_type: ChartType,
}

impl ChartMetadata {
    /// Create metadata with an empty description and URL.
    pub fn new<S1: Into<String>, S2: Into<String>>(
        provider: S1,
        title: S2,
        chart_type: ChartType,
    ) -> Self {
        Self {
            provider: provider.into(),
            title: title.into(),
            description: String::new(),
            url: String::new(),
            chart_type,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    /// Convert to the plain map representation.
    pub fn to_dict(&self) -> Result<Value> {
        converters::to_dict(self)
    }
}

/// One dated edition of a chart.
///
/// Entries are kept in rank order and all carry the item kind named by
/// the metadata. Ranks may have gaps when rows were dropped while parsing.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use mchart::models::{Chart, ChartEntry, ChartMetadata, ChartType, EntryStats, Song};
///
/// let metadata = ChartMetadata::new("billboard", "Billboard Hot 100", ChartType::Single);
/// let entry = ChartEntry::with_song(EntryStats::new(1), Song::new("Flowers", "Miley Cyrus"))?;
/// let chart = Chart::new(metadata, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(), vec![entry])?;
///
/// assert_eq!(chart.top(10).len(), 1);
/// assert_eq!(chart.to_dict()?["published_date"], "2026-01-10");
/// # Ok::<(), mchart::ChartError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChart")]
pub struct Chart {
    metadata: ChartMetadata,
    published_date: NaiveDate,
    entries: Vec<ChartEntry>,
}

impl Chart {
    /// Build a chart.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if an entry carries the wrong item kind for
    /// `metadata.type`, or if entries are not in rank order.
    pub fn new(
        metadata: ChartMetadata,
        published_date: NaiveDate,
        entries: Vec<ChartEntry>,
    ) -> Result<Self> {
        let expected = metadata.chart_type();
        if let Some(entry) = entries.iter().find(|e| e.kind() != expected) {
            return Err(ChartError::Validation(format!(
                "entry at rank {} is a {} entry on a {} chart",
                entry.rank(),
                entry.kind(),
                expected
            )));
        }
        if let Some(pair) = entries.windows(2).find(|w| w[0].rank() > w[1].rank()) {
            return Err(ChartError::Validation(format!(
                "entries out of rank order: {} before {}",
                pair[0].rank(),
                pair[1].rank()
            )));
        }

        Ok(Self {
            metadata,
            published_date,
            entries,
        })
    }

    pub fn metadata(&self) -> &ChartMetadata {
        &self.metadata
    }

    pub fn published_date(&self) -> NaiveDate {
        self.published_date
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn chart_type(&self) -> ChartType {
        self.metadata.chart_type()
    }

    /// Total number of chart entries.
    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// Get the first `n` entries in rank order.
    pub fn top(&self, n: usize) -> &[ChartEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Find entries by artist name.
    ///
    /// Matches the primary artist and every credited artist, ignoring case
    /// and accepting partial names. Rank order is preserved.
    pub fn find_by_artist(&self, artist: &str) -> Vec<&ChartEntry> {
        let needle = artist.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.matches_artist(&needle))
            .collect()
    }

    /// Find entries by song or album title, ignoring case and accepting
    /// partial titles.
    pub fn find_by_title(&self, title: &str) -> Vec<&ChartEntry> {
        let needle = title.to_lowercase();
        self.entries
            .iter()
            .filter(|e| contains_ignore_case(e.title(), &needle))
            .collect()
    }

    /// Convert to the plain map representation.
    pub fn to_dict(&self) -> Result<Value> {
        converters::to_dict(self)
    }
}

#[derive(Deserialize)]
struct RawChart {
    metadata: ChartMetadata,
    published_date: NaiveDate,
    #[serde(default)]
    entries: Vec<ChartEntry>,
}

impl TryFrom<RawChart> for Chart {
    type Error = ChartError;

    fn try_from(raw: RawChart) -> Result<Self> {
        Chart::new(raw.metadata, raw.published_date, raw.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Album, EntryStats, Song};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 21).unwrap()
    }

    fn single_chart(k: u32) -> Chart {
        let metadata = ChartMetadata::new("billboard", "Billboard Hot 100", ChartType::Single);
        let entries = (1..=k)
            .map(|rank| {
                let song = Song::new(format!("Song {}", rank), format!("Artist {}", rank));
                ChartEntry::with_song(EntryStats::new(rank), song).unwrap()
            })
            .collect();
        Chart::new(metadata, date(), entries).unwrap()
    }

    fn ranks(entries: &[ChartEntry]) -> Vec<u32> {
        entries.iter().map(|e| e.rank()).collect()
    }

    #[test]
    fn test_top_bounds() {
        let chart = single_chart(5);
        assert!(chart.top(0).is_empty());
        assert_eq!(ranks(chart.top(1)), vec![1]);
        assert_eq!(ranks(chart.top(5)), vec![1, 2, 3, 4, 5]);
        assert_eq!(ranks(chart.top(10)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_find_by_artist_matches_credited_artists() {
        let metadata = ChartMetadata::new("billboard", "Hot 100", ChartType::Single);
        let entries = vec![
            ChartEntry::with_song(
                EntryStats::new(1),
                Song::new("Snooze", "SZA").with_artists(["SZA"]),
            )
            .unwrap(),
            ChartEntry::with_song(
                EntryStats::new(2),
                Song::new("Other", "Someone Else"),
            )
            .unwrap(),
            ChartEntry::with_song(
                EntryStats::new(3),
                Song::new("Kill Bill", "Doja Cat").with_artists(["Doja Cat", "SZA"]),
            )
            .unwrap(),
        ];
        let chart = Chart::new(metadata, date(), entries).unwrap();

        let found = chart.find_by_artist("SZA");
        assert_eq!(found.iter().map(|e| e.rank()).collect::<Vec<_>>(), vec![1, 3]);

        // Case-insensitive partial match
        let found = chart.find_by_artist("doja");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "Kill Bill");

        assert!(chart.find_by_artist("Nobody").is_empty());
    }

    #[test]
    fn test_find_by_title() {
        let chart = single_chart(12);
        let found = chart.find_by_title("song 1");
        assert_eq!(
            found.iter().map(|e| e.rank()).collect::<Vec<_>>(),
            vec![1, 10, 11, 12]
        );
    }

    #[test]
    fn test_chart_rejects_mismatched_entry_kind() {
        let metadata = ChartMetadata::new("billboard", "Billboard 200", ChartType::Album);
        let entry =
            ChartEntry::with_song(EntryStats::new(1), Song::new("Song", "Artist")).unwrap();
        let result = Chart::new(metadata, date(), vec![entry]);
        assert!(matches!(result, Err(ChartError::Validation(_))));
    }

    #[test]
    fn test_chart_rejects_unordered_entries() {
        let metadata = ChartMetadata::new("billboard", "Billboard 200", ChartType::Album);
        let entries = vec![
            ChartEntry::with_album(EntryStats::new(2), Album::new("B", "Y")).unwrap(),
            ChartEntry::with_album(EntryStats::new(1), Album::new("A", "X")).unwrap(),
        ];
        assert!(Chart::new(metadata, date(), entries).is_err());
    }

    #[test]
    fn test_chart_dict_shape() {
        let metadata = ChartMetadata::new("billboard", "Billboard 200", ChartType::Album)
            .with_description("Top albums")
            .with_url("https://www.billboard.com/charts/billboard-200");
        let entry = ChartEntry::with_album(
            EntryStats::new(1).with_weeks_on_chart(3),
            Album::new("SOS", "SZA").with_image("https://example.com/sos.jpg"),
        )
        .unwrap();
        let chart = Chart::new(metadata, date(), vec![entry]).unwrap();

        let dict = chart.to_dict().unwrap();
        assert_eq!(dict["published_date"], "2026-01-21");
        assert_eq!(dict["metadata"]["type"], "album");
        assert_eq!(dict["metadata"]["provider"], "billboard");
        assert_eq!(dict["entries"][0]["album"]["image"], "https://example.com/sos.jpg");
        assert_eq!(dict["entries"][0]["last_week"], 0);
        assert!(dict["entries"][0].get("song").is_none());
        assert!(dict.get("chart_type").is_none());
    }

    #[test]
    fn test_chart_dict_round_trip() {
        let chart = single_chart(3);
        let dict = chart.to_dict().unwrap();
        let back: Chart = serde_json::from_value(dict).unwrap();
        assert_eq!(back, chart);
    }

    #[test]
    fn test_chart_from_invalid_dict_fails() {
        let dict = serde_json::json!({
            "metadata": {"provider": "billboard", "title": "Billboard 200", "type": "album"},
            "published_date": "2026-01-21",
            "entries": [{"rank": 1, "song": {"title": "A", "artist": "B"}}]
        });
        assert!(serde_json::from_value::<Chart>(dict).is_err());
    }

    #[test]
    fn test_metadata_requires_type() {
        let dict = serde_json::json!({"provider": "billboard", "title": "Billboard Hot 100"});
        assert!(serde_json::from_value::<ChartMetadata>(dict).is_err());

        let dict = serde_json::json!({
            "provider": "billboard",
            "title": "Billboard Hot 100",
            "type": "single"
        });
        let metadata: ChartMetadata = serde_json::from_value(dict).unwrap();
        assert_eq!(metadata.chart_type(), ChartType::Single);
        assert_eq!(metadata.url(), "");
    }
}
