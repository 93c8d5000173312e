//! MACD (Moving Average Convergence Divergence), fixed 12/26/9 windows.
//!
//! macd   = EMA(close, 12) - EMA(close, 26), undefined where either side is.
//! signal = EMA(macd, 9), computed over the defined suffix of the macd line.
//! On a clean series the first defined macd value is index 25 and the first
//! defined signal value index 33 (the 9th defined macd entry).

use super::ema::ema;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

/// MACD line and its signal line, index-aligned with the input.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Compute the MACD of `close`. The session-level period parameter is
/// ignored by this indicator; the 12/26/9 windows are fixed.
pub fn macd(close: &[f64]) -> MacdSeries {
    let n = close.len();
    let fast = ema(close, FAST_PERIOD);
    let slow = ema(close, SLOW_PERIOD);

    let mut line = vec![f64::NAN; n];
    for i in 0..n {
        if fast[i].is_finite() && slow[i].is_finite() {
            line[i] = fast[i] - slow[i];
        }
    }

    let mut signal = vec![f64::NAN; n];
    if let Some(first_defined) = line.iter().position(|v| v.is_finite()) {
        let tail = ema(&line[first_defined..], SIGNAL_PERIOD);
        signal[first_defined..].copy_from_slice(&tail);
    }

    MacdSeries { macd: line, signal }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_undefined_exactly_where_slow_ema_is() {
        let close = ramp(60);
        let out = macd(&close);
        let slow = ema(&close, SLOW_PERIOD);
        for i in 0..close.len() {
            assert_eq!(out.macd[i].is_nan(), slow[i].is_nan(), "mismatch at {i}");
        }
    }

    #[test]
    fn signal_starts_at_ninth_defined_macd_entry() {
        let out = macd(&ramp(60));
        // macd defined from 25; signal from 25 + 8 = 33.
        for v in &out.signal[..33] {
            assert!(v.is_nan());
        }
        assert!(out.signal[33].is_finite());
    }

    #[test]
    fn short_series_has_no_defined_values() {
        let out = macd(&ramp(20));
        assert!(out.macd.iter().all(|v| v.is_nan()));
        assert!(out.signal.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn empty_input() {
        let out = macd(&[]);
        assert!(out.macd.is_empty());
        assert!(out.signal.is_empty());
    }

    #[test]
    fn constant_series_macd_is_zero() {
        let out = macd(&[42.0; 50]);
        for v in &out.macd[25..] {
            assert!((v - 0.0).abs() < 1e-12);
        }
        for v in &out.signal[33..] {
            assert!((v - 0.0).abs() < 1e-12);
        }
    }
}
