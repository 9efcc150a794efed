//! Visible time window over an unsorted reading sequence.

use chrono::{DateTime, Duration, Utc};

use crate::models::ReadingPoint;

/// Fewer visible points than this and the polyline and its markers are skipped.
pub const MIN_LINE_POINTS: usize = 2;

/// `[oldest, now]` interval shown on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub oldest: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl TimeWindow {
    /// Window of `span_hours` ending at `now`.
    pub fn ending_at(now: DateTime<Utc>, span_hours: f64) -> Self {
        let span_ms = (span_hours * 3_600_000.0).round();
        let oldest = Some(span_ms)
            .filter(|ms| ms.is_finite())
            .and_then(|ms| Duration::try_milliseconds(ms as i64))
            .and_then(|span| now.checked_sub_signed(span));
        let oldest = match oldest {
            Some(t) => t,
            None if span_ms > 0.0 => DateTime::<Utc>::MIN_UTC,
            None => now,
        };
        Self { oldest, now }
    }

    pub fn span_ms(&self) -> i64 {
        (self.now - self.oldest).num_milliseconds()
    }
}

/// Points at or after the window start, sorted ascending by timestamp.
///
/// Points newer than `now` are kept; the scale mapper pins them to the right edge.
pub fn windowed(points: &[ReadingPoint], window: &TimeWindow) -> Vec<ReadingPoint> {
    let mut visible: Vec<ReadingPoint> = points
        .iter()
        .filter(|p| p.timestamp >= window.oldest)
        .copied()
        .collect();
    visible.sort_by_key(|p| p.timestamp);
    visible
}

/// Whether a visible series has enough points for a line.
pub fn is_drawable(visible: &[ReadingPoint]) -> bool {
    visible.len() >= MIN_LINE_POINTS
}

/// Freshest sample of the unfiltered input, regardless of the visible window.
pub fn latest(points: &[ReadingPoint]) -> Option<&ReadingPoint> {
    points.iter().max_by_key(|p| p.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn at_hours_ago(h: f64, value: f64) -> ReadingPoint {
        let t = now() - Duration::milliseconds((h * 3_600_000.0) as i64);
        ReadingPoint::new(t, value, 0)
    }

    #[test]
    fn keeps_last_three_of_four_sorted() {
        // arrival order deliberately shuffled
        let points = vec![
            at_hours_ago(1.0, 3.0),
            at_hours_ago(10.0, 1.0),
            at_hours_ago(0.1, 4.0),
            at_hours_ago(5.0, 2.0),
        ];
        let w = TimeWindow::ending_at(now(), 6.0);
        let v = windowed(&points, &w);
        let values: Vec<f64> = v.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn window_start_is_inclusive() {
        let w = TimeWindow::ending_at(now(), 3.0);
        let edge = ReadingPoint::new(w.oldest, 100.0, 0);
        assert_eq!(windowed(&[edge], &w).len(), 1);
    }

    #[test]
    fn sparse_windows_are_not_drawable() {
        let w = TimeWindow::ending_at(now(), 3.0);
        assert!(!is_drawable(&windowed(&[], &w)));
        assert!(!is_drawable(&windowed(&[at_hours_ago(0.5, 1.0)], &w)));
        assert!(is_drawable(&windowed(
            &[at_hours_ago(0.5, 1.0), at_hours_ago(0.2, 1.0)],
            &w
        )));
    }

    #[test]
    fn latest_ignores_window_and_arrival_order() {
        let points = vec![at_hours_ago(0.2, 9.0), at_hours_ago(8.0, 1.0)];
        assert_eq!(latest(&points).map(|p| p.value), Some(9.0));
        assert!(latest(&[]).is_none());
    }

    #[test]
    fn absurd_spans_do_not_overflow() {
        let w = TimeWindow::ending_at(now(), 1e30);
        assert_eq!(w.oldest, DateTime::<Utc>::MIN_UTC);
        assert_eq!(TimeWindow::ending_at(now(), f64::NAN).span_ms(), 0);
        assert!(TimeWindow::ending_at(now(), -1.0).span_ms() < 0);
    }

    #[test]
    fn span_ms_matches_hours() {
        assert_eq!(TimeWindow::ending_at(now(), 3.0).span_ms(), 10_800_000);
    }
}
