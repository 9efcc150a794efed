//! Chart composition: readings → fixed-size JPEG for a small network display.
//!
//! The canvas is split into a header (current value, trend arrow, unit, reading age)
//! and a graph (tinted area, good-range band, span badge, grid, polyline, end markers).
//! Header and graph degrade independently: no readings hides the header, fewer than two
//! visible readings hides the line, and the chart chrome is always drawn.
//!
//! Call [`fonts::init`] once before rendering; without fonts all text is skipped.

pub mod arrows;
pub mod color;
pub mod fonts;
pub mod layout;
pub mod scale;
pub mod text;
pub mod trend;
pub mod window;

pub use layout::{PLOT_RIGHT_GUTTER_PX, Region, Regions, compute_regions};
pub use scale::{GRID_ROWS, GridLine, PixelPoint, ScaleMapper};
pub use trend::{Severity, TrendClass, TrendDirection, classify};
pub use window::{TimeWindow, latest, windowed};

use chrono::{DateTime, Utc};
use image::ColorType;
use image::codecs::jpeg::JpegEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use plotters_bitmap::BitMapBackend;
use rand::Rng;

use crate::config::{ChartConfig, PartialChartConfig, RangeConfig};
use crate::error::{Error, Result};
use crate::mock::generate_mock_points;
use crate::models::ReadingPoint;
use crate::units::DISPLAY_UNIT;
use layout::clamp_coord;
use text::{Label, draw_label, measure};

pub const JPEG_QUALITY: u8 = 92;

/// Readings older than this many minutes are flagged as stale.
pub const STALE_AFTER_MINUTES: i64 = 5;

const VALUE_FONT_PX: f64 = 60.0;
const VALUE_BASELINE_DY: i32 = 60;
const SMALL_FONT_PX: f64 = 12.0;
const AGE_BASELINE_DY: i32 = 32;
const ARROW_SIZE_PX: f64 = 30.0;
/// Arrow center relative to the content origin.
const ARROW_CENTER_DX: f64 = 10.0;
const ARROW_CENTER_DY: f64 = 40.0;
const CLOCK_RADIUS_PX: i32 = 5;

const BADGE_FONT_PX: f64 = 16.0;
const BADGE_PAD_PX: i32 = 3;
const BADGE_RADIUS_PX: i32 = 5;
const BADGE_FILL: RGBAColor = RGBAColor(0, 0, 0, 0.7);

const GRID_LABEL_GAP_PX: i32 = 5;
const GUIDE_DASH_PX: f64 = 2.0;

fn backend_err<E: std::fmt::Debug>(e: E) -> Error {
    Error::Drawing(format!("{:?}", e))
}

// ------------------------ Header ------------------------

/// Where the current value sits relative to the good range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueBand {
    Low,
    InRange,
    High,
}

impl ValueBand {
    pub fn classify(value: f64, range: &RangeConfig) -> Self {
        if value > range.good_max {
            ValueBand::High
        } else if value < range.good_min {
            ValueBand::Low
        } else {
            ValueBand::InRange
        }
    }

    pub fn color_token(&self) -> &'static str {
        match self {
            ValueBand::High => "red",
            ValueBand::Low => "purple",
            ValueBand::InRange => "green",
        }
    }
}

/// Everything the header shows, decided before any pixel is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderPlan {
    pub value_text: String,
    pub band: ValueBand,
    pub trend: TrendClass,
    /// Whole minutes since the freshest reading.
    pub minutes_ago: i64,
    pub stale: bool,
}

impl HeaderPlan {
    pub fn value_color(&self) -> &'static str {
        self.band.color_token()
    }

    pub fn age_color(&self) -> &'static str {
        if self.stale { "orange" } else { "cyan" }
    }

    pub fn age_text(&self) -> String {
        format!("{}'", self.minutes_ago)
    }
}

/// Header contents for the freshest reading of the unfiltered input; `None` when empty.
pub fn plan_header(
    points: &[ReadingPoint],
    config: &ChartConfig,
    now: DateTime<Utc>,
) -> Option<HeaderPlan> {
    let last = latest(points)?;
    let minutes_ago = (now - last.timestamp).num_milliseconds().div_euclid(60_000);
    Some(HeaderPlan {
        value_text: whole_number(last.value),
        band: ValueBand::classify(last.value, &config.range),
        trend: trend::classify_or_flat(last.rate),
        minutes_ago,
        stale: minutes_ago > STALE_AFTER_MINUTES,
    })
}

fn draw_header<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    regions: &Regions,
    config: &ChartConfig,
    plan: &HeaderPlan,
) -> Result<()> {
    let header = regions.header;
    let baseline = header.y + VALUE_BASELINE_DY;

    draw_label(
        area,
        &Label::new(&plan.value_text, (header.x, baseline), VALUE_FONT_PX),
        &color::resolve(plan.value_color()),
    )?;

    let arrow_center = (
        regions.content.x as f64 + ARROW_CENTER_DX,
        header.y as f64 + ARROW_CENTER_DY,
    );
    arrows::draw_arrow(
        area,
        arrow_center,
        ARROW_SIZE_PX,
        plan.trend.direction,
        &color::resolve(plan.trend.color),
    )?;

    let value_w = measure(&plan.value_text, VALUE_FONT_PX, fonts::DEFAULT_FAMILY) as i32;
    let side_x = clamp_coord(header.x as i64 + value_w as i64 + config.padding.left as i64);

    draw_label(
        area,
        &Label::new(DISPLAY_UNIT, (side_x, baseline), SMALL_FONT_PX),
        &color::resolve(&config.style.text_color),
    )?;

    let age_color = color::resolve(plan.age_color());
    let age_y = header.y + AGE_BASELINE_DY;
    draw_clock(
        area,
        (side_x + CLOCK_RADIUS_PX, age_y - CLOCK_RADIUS_PX - 1),
        &age_color,
    )?;
    draw_label(
        area,
        &Label::new(
            &plan.age_text(),
            (side_x + 2 * CLOCK_RADIUS_PX + 3, age_y),
            SMALL_FONT_PX,
        ),
        &age_color,
    )
}

/// Small clock face standing in for an emoji glyph.
fn draw_clock<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    (cx, cy): (i32, i32),
    color: &RGBAColor,
) -> Result<()> {
    let style = color.stroke_width(1);
    area.draw(&Circle::new((cx, cy), CLOCK_RADIUS_PX, style))
        .map_err(backend_err)?;
    area.draw(&PathElement::new(
        vec![(cx, cy - CLOCK_RADIUS_PX + 2), (cx, cy), (cx + CLOCK_RADIUS_PX - 2, cy)],
        style,
    ))
    .map_err(backend_err)
}

// ------------------------ Graph ------------------------

fn fill_region<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    r: &Region,
    color: &RGBAColor,
) -> Result<()> {
    if r.is_empty() {
        return Ok(());
    }
    area.draw(&Rectangle::new(
        [(r.x, r.y), (r.right(), r.bottom())],
        color.filled(),
    ))
    .map_err(backend_err)
}

/// Closed outline of a rectangle with rounded corners (first point repeated at the end).
pub fn rounded_rect_outline(r: &Region, radius: i32) -> Vec<(i32, i32)> {
    let radius = radius.clamp(0, r.width.min(r.height).max(0) / 2) as f64;
    let (x0, y0) = (r.x as f64, r.y as f64);
    let (x1, y1) = (r.right() as f64, r.bottom() as f64);
    // corner centers, each with its starting angle, walked clockwise in screen space
    let corners = [
        (x1 - radius, y0 + radius, -90.0f64),
        (x1 - radius, y1 - radius, 0.0),
        (x0 + radius, y1 - radius, 90.0),
        (x0 + radius, y0 + radius, 180.0),
    ];
    const STEPS: usize = 4;
    let mut pts: Vec<(i32, i32)> = Vec::with_capacity(4 * (STEPS + 1) + 1);
    for (cx, cy, start) in corners {
        for s in 0..=STEPS {
            let a = (start + 90.0 * s as f64 / STEPS as f64).to_radians();
            let p = (
                (cx + radius * a.cos()).round() as i32,
                (cy + radius * a.sin()).round() as i32,
            );
            if pts.last() != Some(&p) {
                pts.push(p);
            }
        }
    }
    if let Some(first) = pts.first().copied() {
        pts.push(first);
    }
    pts
}

/// `x0..x1` cut down to the canvas columns (plus one pixel each side); `None` when the
/// run misses the canvas.
fn clip_span(x0: i32, x1: i32, canvas: &Region) -> Option<(i32, i32)> {
    let lo = x0.max(canvas.x - 1);
    let hi = x1.min(canvas.right() + 1);
    (lo <= hi).then_some((lo, hi))
}

/// Nearest whole number, ties away from zero (`150.5` → `"151"`).
fn whole_number(v: f64) -> String {
    format!("{:.0}", v.round())
}

/// `[start, end]` pairs of a dashed run from `x0` to `x1`.
pub fn dash_segments(x0: f64, x1: f64, dash: f64, gap: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    if dash <= 0.0 || x1 <= x0 {
        return out;
    }
    let mut x = x0;
    while x < x1 {
        out.push((x, (x + dash).min(x1)));
        x += dash + gap.max(0.0);
    }
    out
}

fn span_label(config: &ChartConfig) -> String {
    format!("{}h", config.time.shown_span_hours)
}

/// Badge box anchored at the graph's top-right corner.
pub fn span_badge_region(graph: &Region, text_width: i32) -> Region {
    let width = text_width + 10;
    let height = BADGE_FONT_PX as i32 + BADGE_PAD_PX * 2;
    Region::new(
        graph.right() - width - BADGE_PAD_PX,
        graph.y + BADGE_PAD_PX,
        width,
        height,
    )
}

fn draw_span_badge<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    graph: &Region,
    config: &ChartConfig,
) -> Result<()> {
    let label = span_label(config);
    let text_w = measure(&label, BADGE_FONT_PX, fonts::DEFAULT_FAMILY) as i32;
    let badge = span_badge_region(graph, text_w);
    let outline = rounded_rect_outline(&badge, BADGE_RADIUS_PX);
    let text_color = color::resolve(&config.style.text_color);

    area.draw(&Polygon::new(outline.clone(), BADGE_FILL.filled()))
        .map_err(backend_err)?;
    area.draw(&PathElement::new(outline, text_color.stroke_width(2)))
        .map_err(backend_err)?;
    draw_label(
        area,
        &Label::new(
            &label,
            (badge.x + badge.width / 2, badge.y + badge.height / 2),
            BADGE_FONT_PX,
        )
        .anchor(HPos::Center, VPos::Center),
        &text_color,
    )
}

fn draw_graph<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    regions: &Regions,
    config: &ChartConfig,
    points: &[ReadingPoint],
    now: DateTime<Utc>,
) -> Result<()> {
    let graph = regions.graph;
    let style = &config.style;
    let window = TimeWindow::ending_at(now, config.time.shown_span_hours);
    let mapper = ScaleMapper::new(regions.plot, config.range, window);

    fill_region(area, &graph, &color::resolve(&style.graph_area))?;

    let (band_top, band_bottom) = mapper.good_band();
    let clip = |y: f64| y.max(graph.y as f64).min(graph.bottom() as f64).round() as i32;
    let band = Region::new(
        graph.x,
        clip(band_top),
        graph.width,
        clip(band_bottom) - clip(band_top),
    );
    fill_region(area, &band, &color::resolve(&style.good_range))?;

    draw_span_badge(area, &graph, config)?;

    let grid_color = color::resolve(&style.grid);
    let text_color = color::resolve(&style.text_color);
    let (grid_px, grid_family) = fonts::parse_font_token(&style.font, 10.0);
    for line in mapper.grid_lines(GRID_ROWS) {
        let y = line.y.round() as i32;
        let on_canvas = (regions.canvas.y - 1..=regions.canvas.bottom() + 1).contains(&y);
        if let Some((x0, x1)) = clip_span(graph.x, graph.right(), &regions.canvas)
            .filter(|_| on_canvas)
        {
            area.draw(&PathElement::new(
                vec![(x0, y), (x1, y)],
                grid_color.stroke_width(1),
            ))
            .map_err(backend_err)?;
        }
        let value = whole_number(line.value);
        draw_label(
            area,
            &Label::new(&value, (graph.x - GRID_LABEL_GAP_PX, y), grid_px)
                .family(&grid_family)
                .anchor(HPos::Right, VPos::Center),
            &text_color,
        )?;
    }

    let visible = windowed(points, &window);
    if !window::is_drawable(&visible) {
        log::debug!(
            "{} visible reading(s) in the last {}h; skipping line",
            visible.len(),
            config.time.shown_span_hours
        );
        return Ok(());
    }

    let line: Vec<(i32, i32)> = visible
        .iter()
        .map(|p| mapper.to_pixel(p).to_backend())
        .collect();
    area.draw(&PathElement::new(
        line,
        color::resolve(&style.line).stroke_width(1),
    ))
    .map_err(backend_err)?;

    let Some(last) = visible.last() else {
        return Ok(());
    };
    let last_px = mapper.to_pixel(last);
    let (last_x, last_y) = last_px.to_backend();

    let plot = regions.plot;
    let (guide_x0, guide_x1) =
        clip_span(plot.x, plot.right(), &regions.canvas).unwrap_or((plot.x, plot.x));
    for (x0, x1) in dash_segments(guide_x0 as f64, guide_x1 as f64, GUIDE_DASH_PX, GUIDE_DASH_PX) {
        area.draw(&PathElement::new(
            vec![(x0.round() as i32, last_y), (x1.round() as i32, last_y)],
            grid_color.stroke_width(1),
        ))
        .map_err(backend_err)?;
    }

    // Markers: one pointing at the value axis, one dropping onto the last sample.
    area.draw(&Polygon::new(
        vec![
            (graph.x, last_y),
            (graph.x - 4, last_y - 2),
            (graph.x - 4, last_y + 2),
        ],
        text_color.filled(),
    ))
    .map_err(backend_err)?;
    area.draw(&Polygon::new(
        vec![
            (last_x, last_y - 5),
            (last_x - 3, last_y - 10),
            (last_x + 3, last_y - 10),
        ],
        text_color.filled(),
    ))
    .map_err(backend_err)
}

// ------------------------ Entry points ------------------------

/// Draw the full chart onto any Plotters backend.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[ReadingPoint],
    config: &ChartConfig,
    now: DateTime<Utc>,
) -> Result<()> {
    let regions = compute_regions(config);
    root.fill(&color::resolve(&config.style.background))
        .map_err(backend_err)?;

    match plan_header(points, config, now) {
        Some(plan) => draw_header(root, &regions, config, &plan)?,
        None => log::debug!("no readings; header skipped"),
    }
    draw_graph(root, &regions, config, points, now)
}

/// Encode a packed RGB8 buffer as JPEG.
pub fn encode_jpeg(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode(
        rgb,
        width,
        height,
        ColorType::Rgb8,
    )?;
    Ok(out)
}

/// Fully-configurable entry point: explicit configuration, clock, and random source.
///
/// With identical inputs, `now`, and random state the output is byte-identical.
pub fn render_chart<R: Rng + ?Sized>(
    points: &[ReadingPoint],
    config: &ChartConfig,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<u8>> {
    let (width, height) = (config.size.width, config.size.height);
    if width == 0 || height == 0 {
        return Err(Error::Drawing(format!(
            "canvas has no area ({width}x{height})"
        )));
    }

    let mock;
    let points = if config.generate_mock_data {
        mock = generate_mock_points(config, now, rng);
        mock.as_slice()
    } else {
        points
    };

    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw_chart(&root, points, config, now)?;
        root.present().map_err(backend_err)?;
    }
    let jpeg = encode_jpeg(&buf, width, height)?;
    log::debug!(
        "rendered {} reading(s) into {}x{} jpeg ({} bytes)",
        points.len(),
        width,
        height,
        jpeg.len()
    );
    Ok(jpeg)
}

/// Convenience: merge `overrides` over the defaults and render at the current time.
pub fn render_image(points: &[ReadingPoint], overrides: &PartialChartConfig) -> Result<Vec<u8>> {
    let config = ChartConfig::with_overrides(overrides);
    render_chart(points, &config, Utc::now(), &mut rand::thread_rng())
}
