//! Rate code → trend arrow classification.

use crate::error::{Error, Result};

/// Arrow shape for a trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Flat,
    DiagUp,
    Up,
    DoubleUp,
    DiagDown,
    Down,
    DoubleDown,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Flat => "flat",
            TrendDirection::DiagUp => "diag-up",
            TrendDirection::Up => "up",
            TrendDirection::DoubleUp => "double-up",
            TrendDirection::DiagDown => "diag-down",
            TrendDirection::Down => "down",
            TrendDirection::DoubleDown => "double-down",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How fast the value is moving, regardless of sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Steady,
    Slow,
    Moderate,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendClass {
    /// Text fallback for the arrow.
    pub glyph: &'static str,
    /// Color token, resolved by the drawing layer.
    pub color: &'static str,
    pub direction: TrendDirection,
    pub severity: Severity,
}

const fn class(
    glyph: &'static str,
    color: &'static str,
    direction: TrendDirection,
    severity: Severity,
) -> TrendClass {
    TrendClass {
        glyph,
        color,
        direction,
        severity,
    }
}

// Codes 7 and 8 are "no trend" sentinels in the source feed.
const TABLE: [TrendClass; 9] = [
    class("→", "green", TrendDirection::Flat, Severity::Steady),
    class("↗", "yellow", TrendDirection::DiagUp, Severity::Slow),
    class("↑", "orange", TrendDirection::Up, Severity::Moderate),
    class("⇈", "red", TrendDirection::DoubleUp, Severity::Fast),
    class("↘", "yellow", TrendDirection::DiagDown, Severity::Slow),
    class("↓", "orange", TrendDirection::Down, Severity::Moderate),
    class("⇊", "red", TrendDirection::DoubleDown, Severity::Fast),
    class("→", "green", TrendDirection::Flat, Severity::Steady),
    class("→", "green", TrendDirection::Flat, Severity::Steady),
];

pub fn classify(rate_code: i32) -> Result<TrendClass> {
    usize::try_from(rate_code)
        .ok()
        .and_then(|i| TABLE.get(i))
        .copied()
        .ok_or(Error::InvalidRateCode(rate_code))
}

/// `classify`, falling back to the flat arrow on an out-of-table code.
pub fn classify_or_flat(rate_code: i32) -> TrendClass {
    classify(rate_code).unwrap_or_else(|e| {
        log::warn!("{e}; drawing flat trend arrow");
        TABLE[0]
    })
}
