//! Simple Moving Average.
//!
//! SMA(n) = mean of the last n values. With fewer than n values the last
//! value is returned as-is rather than a partial mean.

/// Mean of the last `period` values, or the last value when the input is
/// shorter than `period`. Empty input yields 0.
pub fn sma(values: &[f64], period: usize) -> f64 {
    let Some(&last) = values.last() else {
        return 0.0;
    };
    if period == 0 || values.len() < period {
        return last;
    }
    let window = &values[values.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_full_window() {
        assert_relative_eq!(sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 5), 30.0);
    }

    #[test]
    fn sma_uses_only_trailing_window() {
        assert_relative_eq!(sma(&[1000.0, 10.0, 20.0, 30.0], 3), 20.0);
    }

    #[test]
    fn sma_short_input_returns_last_value() {
        assert_relative_eq!(sma(&[10.0, 20.0, 35.0], 5), 35.0);
    }

    #[test]
    fn sma_empty_input() {
        assert_eq!(sma(&[], 5), 0.0);
    }

    #[test]
    fn sma_zero_period() {
        assert_relative_eq!(sma(&[1.0, 2.0], 0), 2.0);
    }
}
