//! Common types shared across all models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Chart type: which kind of item every entry of a chart carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Song ranking; entries carry a [`Song`](super::Song).
    #[default]
    Single,
    /// Album ranking; entries carry an [`Album`](super::Album).
    Album,
}

impl ChartType {
    /// Get the wire label used in the plain map form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Single => "single",
            ChartType::Album => "album",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(ChartType::Single),
            "album" => Ok(ChartType::Album),
            other => Err(ChartError::Validation(format!(
                "unknown chart type '{}'",
                other
            ))),
        }
    }
}

/// Join a list of artist names.
pub(crate) fn join_artists(artists: &[String], separator: &str) -> String {
    artists.join(separator)
}

/// Case-insensitive substring match used by the chart search helpers.
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
