/// Percentage change from `previous` to `current`.
///
/// Returns `None` when there is no baseline or the baseline is exactly zero.
/// The sign is preserved and the magnitude is not clamped.
pub fn delta(current: f64, previous: Option<f64>) -> Option<f64> {
    let previous = previous?;
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous.abs() * 100.0)
}

/// Like [`delta`], but with an optional current value.
pub fn delta_between(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    delta(current?, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_or_absent_baseline() {
        assert_eq!(delta(50.0, Some(0.0)), None);
        assert_eq!(delta(50.0, Some(-0.0)), None);
        assert_eq!(delta(50.0, None), None);
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(delta(150.0, Some(100.0)), Some(50.0));
        assert_eq!(delta(50.0, Some(100.0)), Some(-50.0));
        assert_eq!(delta(1000.0, Some(1.0)), Some(99900.0));
    }

    #[test]
    fn test_negative_baseline_uses_magnitude() {
        // loss of 100 improving to a loss of 50 is a +50% move
        assert_eq!(delta(-50.0, Some(-100.0)), Some(50.0));
        assert_eq!(delta(-200.0, Some(-100.0)), Some(-100.0));
    }

    #[test]
    fn test_delta_between() {
        assert_eq!(delta_between(None, Some(10.0)), None);
        assert_eq!(delta_between(Some(20.0), Some(10.0)), Some(100.0));
    }
}
