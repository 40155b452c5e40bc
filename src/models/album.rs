//! Album model.

use serde::{Deserialize, Serialize};

use super::common::join_artists;

/// An album as it appears on an album chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    title: String,

    /// Primary artist.
    artist: String,

    /// All credited artists, primary first.
    #[serde(default)]
    artists: Vec<String>,

    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl Album {
    /// Create an album credited to a single artist.
    pub fn new<S1: Into<String>, S2: Into<String>>(title: S1, artist: S2) -> Self {
        let artist = artist.into();
        Self {
            title: title.into(),
            artists: vec![artist.clone()],
            artist,
            image: None,
        }
    }

    /// Replace the full artist credit list.
    pub fn with_artists<I, S>(mut self, artists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artists = artists.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cover image URL.
    pub fn with_image<S: Into<String>>(mut self, image: S) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Get all artist names joined by a separator.
    pub fn artists_string(&self, separator: &str) -> String {
        join_artists(&self.artists, separator)
    }
}
