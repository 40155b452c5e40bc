//! Chart entry model.
//!
//! A [`ChartEntry`] is one ranked position. It carries exactly one
//! [`ChartItem`], either a song or an album, and the weekly statistics of
//! that position. All invariants are checked when the entry is built.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::album::Album;
use super::common::{contains_ignore_case, ChartType};
use super::song::Song;
use crate::converters;
use crate::error::{ChartError, Result};

/// The ranked item of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartItem {
    Song(Song),
    Album(Album),
}

impl ChartItem {
    /// The chart type this item belongs to.
    pub fn kind(&self) -> ChartType {
        match self {
            ChartItem::Song(_) => ChartType::Single,
            ChartItem::Album(_) => ChartType::Album,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartItem::Song(song) => song.title(),
            ChartItem::Album(album) => album.title(),
        }
    }

    /// Primary artist.
    pub fn artist(&self) -> &str {
        match self {
            ChartItem::Song(song) => song.artist(),
            ChartItem::Album(album) => album.artist(),
        }
    }

    /// All credited artists.
    pub fn artists(&self) -> &[String] {
        match self {
            ChartItem::Song(song) => song.artists(),
            ChartItem::Album(album) => album.artists(),
        }
    }
}

/// Weekly statistics of a chart position.
///
/// `last_week == 0` marks a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStats {
    pub rank: u32,
    pub weeks_on_chart: u32,
    pub last_week: u32,
    pub peak_position: u32,
}

impl EntryStats {
    /// Statistics of a first appearance at `rank`: one week, no previous
    /// rank, peak at the current rank.
    pub fn new(rank: u32) -> Self {
        Self {
            rank,
            weeks_on_chart: 1,
            last_week: 0,
            peak_position: rank,
        }
    }

    pub fn with_weeks_on_chart(mut self, weeks: u32) -> Self {
        self.weeks_on_chart = weeks;
        self
    }

    pub fn with_last_week(mut self, last_week: u32) -> Self {
        self.last_week = last_week;
        self
    }

    pub fn with_peak_position(mut self, peak: u32) -> Self {
        self.peak_position = peak;
        self
    }
}

/// One ranked position on a chart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawChartEntry")]
pub struct ChartEntry {
    stats: EntryStats,
    item: ChartItem,
}

impl ChartEntry {
    /// Build an entry from optional song and album parts.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if both or neither of `song` and `album` are
    /// given, or if `rank` or `peak_position` is zero.
    pub fn new(
        rank: u32,
        weeks_on_chart: u32,
        last_week: u32,
        peak_position: u32,
        song: Option<Song>,
        album: Option<Album>,
    ) -> Result<Self> {
        let item = match (song, album) {
            (Some(song), None) => ChartItem::Song(song),
            (None, Some(album)) => ChartItem::Album(album),
            (Some(_), Some(_)) => {
                return Err(ChartError::Validation(format!(
                    "entry at rank {} cannot have both a song and an album",
                    rank
                )))
            }
            (None, None) => {
                return Err(ChartError::Validation(format!(
                    "entry at rank {} must have either a song or an album",
                    rank
                )))
            }
        };

        Self::from_item(
            EntryStats {
                rank,
                weeks_on_chart,
                last_week,
                peak_position,
            },
            item,
        )
    }

    /// Build a single chart entry.
    pub fn with_song(stats: EntryStats, song: Song) -> Result<Self> {
        Self::from_item(stats, ChartItem::Song(song))
    }

    /// Build an album chart entry.
    pub fn with_album(stats: EntryStats, album: Album) -> Result<Self> {
        Self::from_item(stats, ChartItem::Album(album))
    }

    /// Build an entry from an already typed item.
    pub fn from_item(stats: EntryStats, item: ChartItem) -> Result<Self> {
        if stats.rank == 0 {
            return Err(ChartError::Validation(
                "rank must be a positive integer".to_string(),
            ));
        }
        if stats.peak_position == 0 {
            return Err(ChartError::Validation(format!(
                "peak position of entry at rank {} must be a positive integer",
                stats.rank
            )));
        }
        Ok(Self { stats, item })
    }

    pub fn rank(&self) -> u32 {
        self.stats.rank
    }

    pub fn weeks_on_chart(&self) -> u32 {
        self.stats.weeks_on_chart
    }

    /// Last week's rank, 0 for a new entry.
    pub fn last_week(&self) -> u32 {
        self.stats.last_week
    }

    pub fn peak_position(&self) -> u32 {
        self.stats.peak_position
    }

    pub fn stats(&self) -> EntryStats {
        self.stats
    }

    pub fn item(&self) -> &ChartItem {
        &self.item
    }

    /// The song, present only on single chart entries.
    pub fn song(&self) -> Option<&Song> {
        match &self.item {
            ChartItem::Song(song) => Some(song),
            ChartItem::Album(_) => None,
        }
    }

    /// The album, present only on album chart entries.
    pub fn album(&self) -> Option<&Album> {
        match &self.item {
            ChartItem::Album(album) => Some(album),
            ChartItem::Song(_) => None,
        }
    }

    pub fn kind(&self) -> ChartType {
        self.item.kind()
    }

    pub fn title(&self) -> &str {
        self.item.title()
    }

    pub fn artist(&self) -> &str {
        self.item.artist()
    }

    pub fn artists(&self) -> &[String] {
        self.item.artists()
    }

    /// Whether the entry had no rank last week.
    pub fn is_new(&self) -> bool {
        self.stats.last_week == 0
    }

    /// Whether the primary or any credited artist contains `needle_lower`.
    pub(crate) fn matches_artist(&self, needle_lower: &str) -> bool {
        contains_ignore_case(self.artist(), needle_lower)
            || self
                .artists()
                .iter()
                .any(|a| contains_ignore_case(a, needle_lower))
    }

    /// Convert to the plain map representation.
    pub fn to_dict(&self) -> Result<Value> {
        converters::to_dict(self)
    }
}

/// Borrowed wire form of an entry.
#[derive(Serialize)]
struct ChartEntryRef<'a> {
    rank: u32,
    weeks_on_chart: u32,
    last_week: u32,
    peak_position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    song: Option<&'a Song>,
    #[serde(skip_serializing_if = "Option::is_none")]
    album: Option<&'a Album>,
}

impl Serialize for ChartEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ChartEntryRef {
            rank: self.stats.rank,
            weeks_on_chart: self.stats.weeks_on_chart,
            last_week: self.stats.last_week,
            peak_position: self.stats.peak_position,
            song: self.song(),
            album: self.album(),
        }
        .serialize(serializer)
    }
}

/// Owned wire form of an entry, validated on conversion.
#[derive(Deserialize)]
struct RawChartEntry {
    rank: u32,
    #[serde(default)]
    weeks_on_chart: u32,
    #[serde(default)]
    last_week: u32,
    #[serde(default)]
    peak_position: Option<u32>,
    #[serde(default)]
    song: Option<Song>,
    #[serde(default)]
    album: Option<Album>,
}

impl TryFrom<RawChartEntry> for ChartEntry {
    type Error = ChartError;

    fn try_from(raw: RawChartEntry) -> Result<Self> {
        ChartEntry::new(
            raw.rank,
            raw.weeks_on_chart,
            raw.last_week,
            raw.peak_position.unwrap_or(raw.rank),
            raw.song,
            raw.album,
        )
    }
}
