//! Data models for chart data.
//!
//! This module contains the canonical entities every provider produces:
//! songs, albums, chart entries, chart metadata and charts. Entities are
//! validated when they are built and exposed read-only afterwards.

pub mod album;
pub mod chart;
pub mod common;
pub mod entry;
pub mod song;

// Re-exports for convenience
pub use album::Album;
pub use chart::{Chart, ChartMetadata};
pub use common::ChartType;
pub use entry::{ChartEntry, ChartItem, EntryStats};
pub use song::Song;
