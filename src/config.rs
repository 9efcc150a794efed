//! Chart configuration: typed groups, documented defaults, and the partial-override merge.
//!
//! Every group merges independently and field-by-field, so overriding `range.goodMin`
//! keeps the default `range.max`. No numeric validation happens here; an inverted range
//! renders a visually wrong but harmless chart.

use serde::{Deserialize, Serialize};

/// Canvas and header geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeConfig {
    pub width: u32,
    pub height: u32,
    pub header_height: i32,
    /// Left gutter of the header reserved for the trend arrow; the header text block
    /// starts this far right of the content edge.
    pub trend_width: i32,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
            header_height: 90,
            trend_width: 40,
        }
    }
}

/// Four-sided inset, used for both `margin` and `padding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insets {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Insets {
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(v: i32) -> Self {
        Self::new(v, v, v, v)
    }
}

/// Value-axis domain and the healthy sub-band (expected `min <= goodMin <= goodMax <= max`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeConfig {
    pub min: f64,
    pub max: f64,
    pub good_min: f64,
    pub good_max: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            min: 40.0,
            max: 400.0,
            good_min: 70.0,
            good_max: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeConfig {
    /// Width of the visible window.
    pub shown_span_hours: f64,
    /// Sample cadence; only used when generating mock data.
    pub data_interval_minutes: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            shown_span_hours: 3.0,
            data_interval_minutes: 1,
        }
    }
}

/// Color and font tokens, handed to the drawing surface as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub background: String,
    pub graph_area: String,
    pub good_range: String,
    pub grid: String,
    pub line: String,
    /// CSS-like font shorthand, e.g. `"10px sans-serif"`. Used for grid labels.
    pub font: String,
    pub text_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: "black".into(),
            graph_area: "rgba(255, 255, 255, 0.1)".into(),
            good_range: "rgba(0, 255, 0, 0.2)".into(),
            grid: "rgba(255, 255, 255, 0.2)".into(),
            line: "white".into(),
            font: "10px sans-serif".into(),
            text_color: "white".into(),
        }
    }
}

/// Effective chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub size: SizeConfig,
    pub margin: Insets,
    pub padding: Insets,
    pub range: RangeConfig,
    pub time: TimeConfig,
    pub style: StyleConfig,
    /// Replace the supplied readings with synthesized ones (preview only).
    pub generate_mock_data: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            size: SizeConfig::default(),
            margin: Insets::new(5, 5, 15, 25),
            padding: Insets::uniform(5),
            range: RangeConfig::default(),
            time: TimeConfig::default(),
            style: StyleConfig::default(),
            generate_mock_data: false,
        }
    }
}

// ------------------------ Partial overrides ------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialSize {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub header_height: Option<i32>,
    pub trend_width: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialInsets {
    pub top: Option<i32>,
    pub right: Option<i32>,
    pub bottom: Option<i32>,
    pub left: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub good_min: Option<f64>,
    pub good_max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialTime {
    pub shown_span_hours: Option<f64>,
    pub data_interval_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialStyle {
    pub background: Option<String>,
    pub graph_area: Option<String>,
    pub good_range: Option<String>,
    pub grid: Option<String>,
    pub line: Option<String>,
    pub font: Option<String>,
    pub text_color: Option<String>,
}

/// User-supplied override; any group or field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialChartConfig {
    pub size: PartialSize,
    pub margin: PartialInsets,
    pub padding: PartialInsets,
    pub range: PartialRange,
    pub time: PartialTime,
    pub style: PartialStyle,
    pub generate_mock_data: Option<bool>,
}

impl SizeConfig {
    pub fn merge(&self, o: &PartialSize) -> Self {
        Self {
            width: o.width.unwrap_or(self.width),
            height: o.height.unwrap_or(self.height),
            header_height: o.header_height.unwrap_or(self.header_height),
            trend_width: o.trend_width.unwrap_or(self.trend_width),
        }
    }
}

impl Insets {
    pub fn merge(&self, o: &PartialInsets) -> Self {
        Self {
            top: o.top.unwrap_or(self.top),
            right: o.right.unwrap_or(self.right),
            bottom: o.bottom.unwrap_or(self.bottom),
            left: o.left.unwrap_or(self.left),
        }
    }
}

impl RangeConfig {
    pub fn merge(&self, o: &PartialRange) -> Self {
        Self {
            min: o.min.unwrap_or(self.min),
            max: o.max.unwrap_or(self.max),
            good_min: o.good_min.unwrap_or(self.good_min),
            good_max: o.good_max.unwrap_or(self.good_max),
        }
    }
}

impl TimeConfig {
    pub fn merge(&self, o: &PartialTime) -> Self {
        Self {
            shown_span_hours: o.shown_span_hours.unwrap_or(self.shown_span_hours),
            data_interval_minutes: o.data_interval_minutes.unwrap_or(self.data_interval_minutes),
        }
    }
}

impl StyleConfig {
    pub fn merge(&self, o: &PartialStyle) -> Self {
        let pick = |over: &Option<String>, base: &String| over.clone().unwrap_or_else(|| base.clone());
        Self {
            background: pick(&o.background, &self.background),
            graph_area: pick(&o.graph_area, &self.graph_area),
            good_range: pick(&o.good_range, &self.good_range),
            grid: pick(&o.grid, &self.grid),
            line: pick(&o.line, &self.line),
            font: pick(&o.font, &self.font),
            text_color: pick(&o.text_color, &self.text_color),
        }
    }
}

/// Merge `overrides` over `defaults`, group by group.
pub fn merge(defaults: &ChartConfig, overrides: &PartialChartConfig) -> ChartConfig {
    ChartConfig {
        size: defaults.size.merge(&overrides.size),
        margin: defaults.margin.merge(&overrides.margin),
        padding: defaults.padding.merge(&overrides.padding),
        range: defaults.range.merge(&overrides.range),
        time: defaults.time.merge(&overrides.time),
        style: defaults.style.merge(&overrides.style),
        generate_mock_data: overrides
            .generate_mock_data
            .unwrap_or(defaults.generate_mock_data),
    }
}

impl ChartConfig {
    /// Defaults with `overrides` applied.
    pub fn with_overrides(overrides: &PartialChartConfig) -> Self {
        merge(&ChartConfig::default(), overrides)
    }
}
