use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::units;

/// Raw sample as delivered by the data source: `[epoch_seconds, mmol, rate_code]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, i32)", into = "(f64, f64, i32)")]
pub struct RawSample {
    pub epoch_seconds: f64,
    pub mmol: f64,
    pub rate: i32,
}

impl From<(f64, f64, i32)> for RawSample {
    fn from((epoch_seconds, mmol, rate): (f64, f64, i32)) -> Self {
        Self {
            epoch_seconds,
            mmol,
            rate,
        }
    }
}

impl From<RawSample> for (f64, f64, i32) {
    fn from(s: RawSample) -> Self {
        (s.epoch_seconds, s.mmol, s.rate)
    }
}

/// One glucose reading in display units (one row = one sample).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingPoint {
    /// Sample instant; serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Value in mg/dL.
    pub value: f64,
    /// Trend rate code, expected in `0..=8`.
    pub rate: i32,
}

impl ReadingPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64, rate: i32) -> Self {
        Self {
            timestamp,
            value,
            rate,
        }
    }

    /// Convert a raw sample; `None` when the epoch is not representable.
    pub fn from_raw(raw: &RawSample) -> Option<Self> {
        if !raw.epoch_seconds.is_finite() {
            return None;
        }
        let millis = (raw.epoch_seconds * 1000.0).round() as i64;
        let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(Self::new(timestamp, units::convert(raw.mmol), raw.rate))
    }
}

/// Normalize raw samples into display-unit readings, keeping arrival order.
pub fn preprocess(raw: &[RawSample]) -> Vec<ReadingPoint> {
    raw.iter()
        .filter_map(|s| {
            let point = ReadingPoint::from_raw(s);
            if point.is_none() {
                log::warn!("dropping sample with unusable timestamp {}", s.epoch_seconds);
            }
            point
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_triple_deserializes() {
        let v: Vec<RawSample> =
            serde_json::from_str("[[1700000000, 5.5, 2], [1700000300.5, 10.0, 0]]").unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].epoch_seconds, 1_700_000_000.0);
        assert_eq!(v[1].rate, 0);
    }

    #[test]
    fn preprocess_converts_units_and_epoch() {
        let raw = [RawSample::from((1_700_000_000.0, 10.0, 3))];
        let pts = preprocess(&raw);
        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].value, 180.0);
        assert_eq!(pts[0].rate, 3);
        assert_eq!(pts[0].timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn preprocess_keeps_arrival_order() {
        let raw = [
            RawSample::from((1_700_000_600.0, 6.0, 0)),
            RawSample::from((1_700_000_000.0, 5.0, 0)),
        ];
        let pts = preprocess(&raw);
        assert!(pts[0].timestamp > pts[1].timestamp);
    }

    #[test]
    fn non_finite_epoch_is_dropped() {
        let raw = [
            RawSample::from((f64::NAN, 5.0, 0)),
            RawSample::from((1_700_000_000.0, 5.0, 0)),
        ];
        assert_eq!(preprocess(&raw).len(), 1);
    }

    #[test]
    fn reading_point_json_uses_millis() {
        let p = ReadingPoint::new(
            DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
            120.0,
            1,
        );
        let s = serde_json::to_string(&p).unwrap();
        assert!(s.contains("1700000000000"));
        let back: ReadingPoint = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }
}
