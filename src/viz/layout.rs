//! Region derivation: canvas → content → {header, graph} → plot.
//!
//! Non-positive sizes are carried through and simply draw nothing. Every edge is kept
//! within [`COORD_LIMIT`] of the origin, so unvalidated configuration values can shift
//! regions off the canvas but never overflow.

use crate::config::{ChartConfig, Insets};

/// Right-side gutter of the plot, reserved for the span badge and end markers.
pub const PLOT_RIGHT_GUTTER_PX: i32 = 40;

/// Largest coordinate or extent a region carries; far beyond any real canvas.
pub const COORD_LIMIT: i32 = 1 << 20;

/// Narrow a wide intermediate to a region coordinate.
pub fn clamp_coord(v: i64) -> i32 {
    v.clamp(-(COORD_LIMIT as i64), COORD_LIMIT as i64) as i32
}

/// Rectangle in device pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region from wide values, each clamped to [`COORD_LIMIT`].
    pub fn bounded(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self::new(
            clamp_coord(x),
            clamp_coord(y),
            clamp_coord(width),
            clamp_coord(height),
        )
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// True when nothing can be drawn inside.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn inset(&self, by: &Insets) -> Self {
        let (left, top) = (by.left as i64, by.top as i64);
        Self::bounded(
            self.x as i64 + left,
            self.y as i64 + top,
            self.width as i64 - left - by.right as i64,
            self.height as i64 - top - by.bottom as i64,
        )
    }

    pub fn contains(&self, other: &Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Every region a render needs, derived from one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub canvas: Region,
    pub content: Region,
    pub header: Region,
    pub graph: Region,
    pub plot: Region,
}

pub fn compute_regions(config: &ChartConfig) -> Regions {
    let size = &config.size;
    let canvas = Region::bounded(0, 0, size.width as i64, size.height as i64);
    let content = canvas.inset(&config.margin);

    let (trend_width, header_height) = (size.trend_width as i64, size.header_height as i64);
    let header = Region::bounded(
        content.x as i64 + trend_width,
        content.y as i64,
        content.width as i64 - trend_width,
        header_height,
    );

    let graph = Region::bounded(
        content.x as i64,
        content.y as i64 + header_height,
        content.width as i64,
        content.height as i64 - header_height,
    );

    let mut plot = graph.inset(&config.padding);
    plot.width -= PLOT_RIGHT_GUTTER_PX;

    Regions {
        canvas,
        content,
        header,
        graph,
        plot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PartialChartConfig, PartialInsets, PartialSize};

    #[test]
    fn default_layout_dimensions() {
        let cfg = ChartConfig::default();
        let r = compute_regions(&cfg);
        assert_eq!(r.content, Region::new(25, 5, 210, 220));
        assert_eq!(r.header, Region::new(65, 5, 170, 90));
        assert_eq!(r.graph, Region::new(25, 95, 210, 130));
        assert_eq!(
            r.plot.height,
            r.graph.height - cfg.padding.top - cfg.padding.bottom
        );
        assert_eq!(r.plot, Region::new(30, 100, 160, 120));
    }

    #[test]
    fn regions_nest() {
        let r = compute_regions(&ChartConfig::default());
        assert!(r.canvas.contains(&r.content));
        assert!(r.content.contains(&r.header));
        assert!(r.content.contains(&r.graph));
        assert!(r.graph.contains(&r.plot));
    }

    #[test]
    fn regions_nest_for_other_positive_margins() {
        for (m, p) in [(1, 1), (10, 3), (20, 8)] {
            let o = PartialChartConfig {
                size: PartialSize {
                    width: Some(320),
                    height: Some(300),
                    ..Default::default()
                },
                margin: PartialInsets {
                    top: Some(m),
                    right: Some(m),
                    bottom: Some(m),
                    left: Some(m),
                },
                padding: PartialInsets {
                    top: Some(p),
                    right: Some(p),
                    bottom: Some(p),
                    left: Some(p),
                },
                ..Default::default()
            };
            let r = compute_regions(&ChartConfig::with_overrides(&o));
            assert!(r.canvas.contains(&r.content));
            assert!(r.content.contains(&r.header));
            assert!(r.content.contains(&r.graph));
            assert!(r.graph.contains(&r.plot));
        }
    }

    #[test]
    fn trend_width_shifts_header_only() {
        let o = PartialChartConfig {
            size: PartialSize {
                trend_width: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let shifted = compute_regions(&ChartConfig::default());
        let flush = compute_regions(&ChartConfig::with_overrides(&o));
        assert_eq!(flush.header.x, flush.content.x);
        assert_eq!(shifted.header.x - flush.header.x, 40);
        assert_eq!(shifted.graph, flush.graph);
    }

    #[test]
    fn tiny_canvas_yields_empty_regions_without_panicking() {
        let o = PartialChartConfig {
            size: PartialSize {
                width: Some(20),
                height: Some(20),
                ..Default::default()
            },
            ..Default::default()
        };
        let r = compute_regions(&ChartConfig::with_overrides(&o));
        assert!(r.plot.is_empty());
        assert!(r.graph.is_empty());
    }

    #[test]
    fn extreme_offsets_stay_bounded() {
        for o in [
            r#"{"size": {"trendWidth": 2147483647}}"#,
            r#"{"size": {"headerHeight": 2147483647}}"#,
            r#"{"size": {"headerHeight": -2147483648}}"#,
            r#"{"margin": {"left": -2147483648, "right": 2147483647}}"#,
            r#"{"padding": {"top": 2147483647, "bottom": -2147483648}}"#,
        ] {
            let o: PartialChartConfig = serde_json::from_str(o).unwrap();
            let r = compute_regions(&ChartConfig::with_overrides(&o));
            for region in [r.canvas, r.content, r.header, r.graph, r.plot] {
                assert!(region.x.abs() <= COORD_LIMIT, "{o:?} -> {region:?}");
                assert!(region.y.abs() <= COORD_LIMIT, "{o:?} -> {region:?}");
                assert!(region.width.abs() <= COORD_LIMIT + PLOT_RIGHT_GUTTER_PX);
                assert!(region.height.abs() <= COORD_LIMIT);
            }
        }
    }

    #[test]
    fn huge_canvas_is_clamped_not_wrapped() {
        let o = PartialChartConfig {
            size: PartialSize {
                width: Some(u32::MAX),
                ..Default::default()
            },
            ..Default::default()
        };
        let r = compute_regions(&ChartConfig::with_overrides(&o));
        assert_eq!(r.canvas.width, COORD_LIMIT);
    }
}
