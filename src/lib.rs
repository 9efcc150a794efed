//! glucotv
//!
//! Renders continuous glucose monitor readings into a small square JPEG for a
//! network photo-frame display, and keeps that display up to date.
//!
//! ### Features
//! - Normalize raw `[epoch_seconds, mmol, rate]` samples into mg/dL readings
//! - Compose a header (current value, trend arrow, reading age) and a time-series graph
//! - Deep-merge partial JSON configuration over built-in defaults
//! - Fetch from the follower service and upload to the display in one refresh
//! - Save readings as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use glucotv::{PartialChartConfig, ReadingPoint};
//! use chrono::Utc;
//!
//! glucotv::viz::fonts::init("assets")?;
//! let readings = vec![ReadingPoint::new(Utc::now(), 112.0, 1)];
//! let jpeg = glucotv::render_image(&readings, &PartialChartConfig::default())?;
//! std::fs::write("glucose.jpg", jpeg)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod device;
pub mod error;
pub mod mock;
pub mod models;
pub mod service;
pub mod settings;
pub mod storage;
pub mod units;
pub mod viz;

pub use config::{ChartConfig, PartialChartConfig};
pub use error::{Error, Result};
pub use models::{RawSample, ReadingPoint};
pub use viz::{render_chart, render_image};
