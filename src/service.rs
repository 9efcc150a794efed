//! One end-to-end screen refresh: fetch, normalize, render, upload.

use anyhow::{Context, Result};
use chrono::Utc;

use crate::api::DataSource;
use crate::config::{self, ChartConfig, PartialChartConfig};
use crate::device::DeviceUploader;
use crate::models::{ReadingPoint, preprocess};
use crate::settings::{PartialRefreshSettings, RefreshSettings};
use crate::viz;

/// What a completed refresh used and drew.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub settings: RefreshSettings,
    pub readings: Vec<ReadingPoint>,
    /// The frame that was uploaded.
    pub jpeg: Vec<u8>,
}

/// Run a full refresh.
///
/// `chart` carries caller rendering options (style, size); the span, the good range,
/// and the mock flag always come from the merged refresh settings.
pub fn refresh_screen<S, U>(
    source: &S,
    uploader: &U,
    overrides: &PartialRefreshSettings,
    chart: &PartialChartConfig,
) -> Result<RefreshOutcome>
where
    S: DataSource + ?Sized,
    U: DeviceUploader + ?Sized,
{
    let settings = RefreshSettings::default().merge(overrides);
    log::info!(
        "refresh: span {}h, good range {}..{}",
        settings.span_hours,
        settings.bs_limits.low,
        settings.bs_limits.high
    );

    let raw = source
        .fetch(settings.span_hours)
        .context("fetch readings")?;
    let readings = preprocess(&raw);

    let config = chart_config(&settings, chart);
    let jpeg = viz::render_chart(&readings, &config, Utc::now(), &mut rand::thread_rng())
        .context("render chart")?;
    uploader.upload(&jpeg).context("upload frame")?;

    Ok(RefreshOutcome {
        settings,
        readings,
        jpeg,
    })
}

/// Effective chart configuration for a refresh: defaults, then caller options, then
/// the settings-derived fields.
pub fn chart_config(settings: &RefreshSettings, chart: &PartialChartConfig) -> ChartConfig {
    let base = ChartConfig::with_overrides(chart);
    config::merge(&base, &settings.chart_overrides())
}
