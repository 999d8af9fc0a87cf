//! Population standard deviation over the trailing `period` values.
//!
//! STDDEV(n) = sqrt(sum((x - SMA(n))^2) / n)
//! Fewer than n values yields 0.

pub fn stddev(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return 0.0;
    }
    let window = &values[values.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    variance.sqrt()
}

/// Simple percentage returns between consecutive values.
pub fn pct_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}
