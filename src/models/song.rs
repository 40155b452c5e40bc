//! Song model.

use serde::{Deserialize, Serialize};

use super::common::join_artists;

/// A song as it appears on a single chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    title: String,

    /// Primary artist.
    artist: String,

    /// All credited artists, primary first.
    #[serde(default)]
    artists: Vec<String>,

    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,

    /// Name of the album the song comes from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    album: Option<String>,
}

impl Song {
    /// Create a song credited to a single artist.
    pub fn new<S1: Into<String>, S2: Into<String>>(title: S1, artist: S2) -> Self {
        let artist = artist.into();
        Self {
            title: title.into(),
            artists: vec![artist.clone()],
            artist,
            image: None,
            album: None,
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

    /// Set the source album name.
    pub fn with_album<S: Into<String>>(mut self, album: S) -> Self {
        self.album = Some(album.into());
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

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    /// Get all artist names joined by a separator.
    pub fn artists_string(&self, separator: &str) -> String {
        join_artists(&self.artists, separator)
    }
}
