//! Data space → plot pixel space.

use chrono::{DateTime, Utc};

use super::layout::Region;
use super::window::TimeWindow;
use crate::config::RangeConfig;
use crate::models::ReadingPoint;

/// Number of grid bands; `GRID_ROWS + 1` lines are drawn.
pub const GRID_ROWS: usize = 6;

/// Sub-pixel position; rounded only when handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Backend coordinates are kept within this distance of the origin; the bitmap
/// rasterizer walks every pixel of a line, including the clipped part.
const BACKEND_LIMIT: f64 = 10_000.0;

impl PixelPoint {
    pub fn to_backend(self) -> (i32, i32) {
        let snap = |v: f64| {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(-BACKEND_LIMIT, BACKEND_LIMIT) as i32
            }
        };
        (snap(self.x), snap(self.y))
    }
}

/// Horizontal grid line and the value it marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ScaleMapper {
    pub plot: Region,
    pub range: RangeConfig,
    pub window: TimeWindow,
}

impl ScaleMapper {
    pub fn new(plot: Region, range: RangeConfig, window: TimeWindow) -> Self {
        Self {
            plot,
            range,
            window,
        }
    }

    /// Timestamps outside the window are pinned to its edges.
    pub fn time_to_x(&self, t: DateTime<Utc>) -> f64 {
        let span = self.window.span_ms();
        let left = self.plot.x as f64;
        let width = self.plot.width as f64;
        if span <= 0 {
            return left + width;
        }
        let t = t.clamp(self.window.oldest, self.window.now);
        let offset = (t - self.window.oldest).num_milliseconds() as f64;
        left + offset / span as f64 * width
    }

    /// Inverted value axis. Not clamped: values outside `[min, max]` land outside the plot.
    /// An empty range puts everything on the vertical center.
    pub fn value_to_y(&self, value: f64) -> f64 {
        let top = self.plot.y as f64;
        let height = self.plot.height as f64;
        let span = self.range.max - self.range.min;
        if span == 0.0 || !span.is_finite() {
            return top + height / 2.0;
        }
        top + height - (value - self.range.min) / span * height
    }

    pub fn to_pixel(&self, p: &ReadingPoint) -> PixelPoint {
        PixelPoint {
            x: self.time_to_x(p.timestamp),
            y: self.value_to_y(p.value),
        }
    }

    /// `rows + 1` evenly spaced lines from `range.max` (top) down to `range.min`.
    pub fn grid_lines(&self, rows: usize) -> Vec<GridLine> {
        let rows = rows.max(1);
        let span = self.range.max - self.range.min;
        (0..=rows)
            .map(|i| {
                let f = i as f64 / rows as f64;
                GridLine {
                    y: self.plot.y as f64 + f * self.plot.height as f64,
                    value: self.range.max - f * span,
                }
            })
            .collect()
    }

    /// Vertical extent `(top, bottom)` of the good-range band.
    pub fn good_band(&self) -> (f64, f64) {
        (
            self.value_to_y(self.range.good_max),
            self.value_to_y(self.range.good_min),
        )
    }
}
