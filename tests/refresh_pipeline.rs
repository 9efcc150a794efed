use anyhow::Result;
use chrono::Utc;
use glucotv::RawSample;
use glucotv::api::DataSource;
use glucotv::device::DeviceUploader;
use glucotv::service::refresh_screen;
use glucotv::settings::PartialRefreshSettings;
use glucotv::{PartialChartConfig, config::PartialSize};
use std::sync::Mutex;

struct StaticSource(Vec<RawSample>);

impl DataSource for StaticSource {
    fn fetch(&self, _span_hours: u32) -> Result<Vec<RawSample>> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct MemoryDisplay {
    last: Mutex<Option<Vec<u8>>>,
}

impl DeviceUploader for MemoryDisplay {
    fn upload(&self, jpeg: &[u8]) -> Result<()> {
        *self.last.lock().unwrap() = Some(jpeg.to_vec());
        Ok(())
    }
}

struct BrokenDisplay;

impl DeviceUploader for BrokenDisplay {
    fn upload(&self, _jpeg: &[u8]) -> Result<()> {
        anyhow::bail!("connection refused")
    }
}

fn feed() -> Vec<RawSample> {
    let now = Utc::now().timestamp() as f64;
    // Arrival order is not chronological.
    vec![
        RawSample { epoch_seconds: now - 120.0, mmol: 7.0, rate: 3 },
        RawSample { epoch_seconds: now - 3600.0, mmol: 5.0, rate: 0 },
        RawSample { epoch_seconds: now - 1800.0, mmol: 6.0, rate: 2 },
    ]
}

#[test]
fn display_receives_frame_sized_by_caller_options() {
    let display = MemoryDisplay::default();
    let chart = PartialChartConfig {
        size: PartialSize {
            width: Some(320),
            height: Some(240),
            ..Default::default()
        },
        ..Default::default()
    };
    let out = refresh_screen(
        &StaticSource(feed()),
        &display,
        &PartialRefreshSettings::default(),
        &chart,
    )
    .unwrap();

    assert_eq!(out.readings.len(), 3);
    assert_eq!(out.readings[0].value, 126.0);
    let frame = display.last.lock().unwrap().clone().unwrap();
    let img = image::load_from_memory(&frame).unwrap();
    assert_eq!((img.width(), img.height()), (320, 240));
}

#[test]
fn upload_errors_surface_with_context() {
    let err = refresh_screen(
        &StaticSource(feed()),
        &BrokenDisplay,
        &PartialRefreshSettings::default(),
        &PartialChartConfig::default(),
    )
    .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("upload frame"));
    assert!(msg.contains("connection refused"));
}

#[test]
fn refresh_settings_parse_from_json() {
    let o: PartialRefreshSettings =
        serde_json::from_str(r#"{"spanHours": 12, "bsLimits": {"low": 65}}"#).unwrap();
    let out = refresh_screen(
        &StaticSource(Vec::new()),
        &MemoryDisplay::default(),
        &o,
        &PartialChartConfig::default(),
    )
    .unwrap();
    assert_eq!(out.settings.span_hours, 12);
    assert_eq!(out.settings.bs_limits.low, 65.0);
    assert_eq!(out.settings.bs_limits.high, 200.0);
    assert!(out.readings.is_empty());
}
