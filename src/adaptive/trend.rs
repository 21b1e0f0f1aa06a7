use crate::types::TrendLabel;

/// Simple least-squares slope over the index sequence 0..n.
pub fn least_squares_slope(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();

    let denominator = n * sum_xx - sum_x.powi(2);
    if denominator.abs() < 1e-10 {
        return 0.0;
    }

    (n * sum_xy - sum_x * sum_y) / denominator
}

/// Label a window of recent accuracies for the persisted record. Uses the
/// same slope the adapter decides on.
pub fn label_accuracy_trend(recent_accuracies: &[f64]) -> TrendLabel {
    let slope = least_squares_slope(recent_accuracies);
    if slope > 0.5 {
        TrendLabel::Improving
    } else if slope < -0.5 {
        TrendLabel::Declining
    } else {
        TrendLabel::Steady
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_rising_series_is_positive() {
        let values = [60.0, 65.0, 70.0, 75.0, 80.0];
        let slope = least_squares_slope(&values);
        assert!((slope - 5.0).abs() < 1e-9);
    }

    #[test]
    fn slope_of_flat_series_is_zero() {
        assert_eq!(least_squares_slope(&[80.0, 80.0, 80.0]), 0.0);
        assert_eq!(least_squares_slope(&[80.0]), 0.0);
        assert_eq!(least_squares_slope(&[]), 0.0);
    }

    #[test]
    fn labels_follow_slope_direction() {
        assert_eq!(label_accuracy_trend(&[50.0, 60.0, 70.0]), TrendLabel::Improving);
        assert_eq!(label_accuracy_trend(&[70.0, 60.0, 50.0]), TrendLabel::Declining);
        assert_eq!(label_accuracy_trend(&[70.0, 70.2, 69.9]), TrendLabel::Steady);
    }
}
