//! Trend arrow geometry.
//!
//! Geometry is computed as open polylines in sub-pixel space so it can be tested without a
//! backend. Double arrows are two single arrows at offset centers.

use std::f64::consts::SQRT_2;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::trend::TrendDirection;
use crate::error::{Error, Result};

pub const ARROW_STROKE_PX: u32 = 3;

pub type Stroke = Vec<(f64, f64)>;

/// Strokes (shaft + head) of one arrow centered at `(x, y)` spanning `size` pixels.
pub fn arrow_strokes(center: (f64, f64), size: f64, direction: TrendDirection) -> Vec<Stroke> {
    let (x, y) = center;
    let half = size / 2.0;
    let third = size / 3.0;
    let sixth = size / 6.0;

    match direction {
        TrendDirection::Up => vec![
            vec![(x, y + half), (x, y - half)],
            vec![(x - sixth, y - third), (x, y - half), (x + sixth, y - third)],
        ],
        TrendDirection::Down => vec![
            vec![(x, y + half), (x, y - half)],
            vec![(x - sixth, y + third), (x, y + half), (x + sixth, y + third)],
        ],
        TrendDirection::Flat => vec![
            vec![(x - half, y), (x + half, y)],
            vec![(x + third, y - sixth), (x + half, y), (x + third, y + sixth)],
        ],
        TrendDirection::DiagUp => {
            let d = size / SQRT_2 / 2.0;
            let tip = (x + d, y - d);
            vec![
                vec![(x - d, y + d), tip],
                vec![(tip.0 - third, tip.1), tip, (tip.0, tip.1 + third)],
            ]
        }
        TrendDirection::DiagDown => {
            let d = size / SQRT_2 / 2.0;
            let tip = (x + d, y + d);
            vec![
                vec![(x - d, y - d), tip],
                vec![(tip.0 - third, tip.1), tip, (tip.0, tip.1 - third)],
            ]
        }
        TrendDirection::DoubleUp => {
            let q = size / 4.0;
            let mut strokes = arrow_strokes((x - q, y + q), size, TrendDirection::Up);
            strokes.extend(arrow_strokes((x + q, y + q), size, TrendDirection::Up));
            strokes
        }
        TrendDirection::DoubleDown => {
            let q = size / 4.0;
            let mut strokes = arrow_strokes((x - q, y - q), size, TrendDirection::Down);
            strokes.extend(arrow_strokes((x + q, y - q), size, TrendDirection::Down));
            strokes
        }
    }
}

/// Stroke an arrow onto `area`.
pub fn draw_arrow<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    center: (f64, f64),
    size: f64,
    direction: TrendDirection,
    color: &RGBAColor,
) -> Result<()> {
    for stroke in arrow_strokes(center, size, direction) {
        let pts: Vec<(i32, i32)> = stroke
            .iter()
            .map(|(x, y)| (x.round() as i32, y.round() as i32))
            .collect();
        area.draw(&PathElement::new(
            pts,
            color.stroke_width(ARROW_STROKE_PX),
        ))
        .map_err(|e| Error::Drawing(format!("{:?}", e)))?;
    }
    Ok(())
}
