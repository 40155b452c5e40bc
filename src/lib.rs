//! # mchart
//!
//! A unified client for music chart data. Chart pages from different
//! sources are normalized into one data model and returned either as typed
//! records or as plain JSON maps.
//!
//! ## Quick Start
//!
//! The easiest way to use this library is through the [`MChart`] struct:
//!
//! ```rust,no_run
//! use mchart::{MChart, ReturnType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MChart::new()?;
//!
//!     // Latest Hot 100 as a typed chart
//!     let chart = client
//!         .get_chart("billboard", "hot-100", ReturnType::Model)
//!         .await?
//!         .into_model()
//!         .ok_or("expected a model")?;
//!     for entry in chart.top(10) {
//!         println!("{}. {} - {}", entry.rank(), entry.title(), entry.artist());
//!     }
//!
//!     // Every chart a provider knows, as plain maps
//!     let charts = client.list_charts("billboard", ReturnType::Dict)?;
//!     println!("{}", charts.into_dict()?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Providers
//!
//! - `billboard`: scrapes billboard.com; latest charts only
//! - `spotify`: registered but not implemented yet
//!
//! Further sources implement [`Provider`] and are added with
//! [`MChart::register`].

pub mod client;
pub mod config;
pub mod converters;
pub mod error;
pub mod http;
pub mod models;
pub mod providers;

// Main interface (recommended)
pub use client::MChart;
pub use config::{ClientConfig, ProviderOptions};
pub use converters::{ChartData, ReturnType};
pub use error::{ChartError, FetchError, Result};
pub use models::{Album, Chart, ChartEntry, ChartMetadata, ChartType, Song};
pub use providers::{Capabilities, Capability, Provider};
