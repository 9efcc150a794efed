//! Concentration unit conversion.

/// Molar mass factor between mmol/L and mg/dL for glucose.
pub const MGDL_PER_MMOL: f64 = 18.01559;

/// Display unit label drawn next to the current value.
pub const DISPLAY_UNIT: &str = "mg/dL";

/// Convert a raw mmol/L reading to whole mg/dL.
///
/// `f64::round` rounds half away from zero; the source feed never carries negative
/// concentrations, so this matches the integer values the device has always shown.
pub fn convert(raw_mmol: f64) -> f64 {
    (raw_mmol * MGDL_PER_MMOL).round()
}

/// Clamp a display value into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics on an inverted range; `max` wins.
pub fn clamp_value(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_mmol_is_180_mgdl() {
        assert_eq!(convert(10.0), 180.0);
    }

    #[test]
    fn conversion_is_monotonic() {
        let mut prev = convert(0.0);
        for i in 1..=400 {
            let next = convert(i as f64 * 0.05);
            assert!(next >= prev, "convert not monotonic at step {i}");
            prev = next;
        }
    }

    #[test]
    fn conversion_yields_whole_numbers() {
        for raw in [3.9, 5.55, 7.2, 13.9, 22.2] {
            let v = convert(raw);
            assert_eq!(v, v.trunc());
        }
    }

    #[test]
    fn clamp_handles_inverted_range() {
        assert_eq!(clamp_value(500.0, 40.0, 400.0), 400.0);
        assert_eq!(clamp_value(10.0, 40.0, 400.0), 40.0);
        assert_eq!(clamp_value(100.0, 200.0, 50.0), 50.0);
    }
}
