//! Bollinger Bands — SMA middle band ± 2 population standard deviations.
//!
//! middle = SMA(close, period)
//! upper  = middle + K * stddev(window)
//! lower  = middle - K * stddev(window)
//! Uses population stddev (divide by N). Bands are undefined exactly where
//! the SMA is undefined.

const K: f64 = 2.0;

/// The three Bollinger series, index-aligned with the input.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Compute Bollinger Bands of `close` over `period` with the fixed K = 2.
pub fn bollinger(close: &[f64], period: usize) -> BollingerBands {
    let n = close.len();
    let mut upper = vec![f64::NAN; n];
    let mut middle = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];

    if period > 0 && n >= period {
        for i in (period - 1)..n {
            let window = &close[i + 1 - period..=i];
            if window.iter().any(|v| !v.is_finite()) {
                continue;
            }
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance = window
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            let stddev = variance.sqrt();

            middle[i] = mean;
            upper[i] = mean + K * stddev;
            lower[i] = mean - K * stddev;
        }
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
