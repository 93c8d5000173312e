//! Indicator numerics.
//!
//! Pure functions over a close-price array: `&[f64]` in, `Vec<f64>` of the
//! same length out, aligned index-for-index. Undefined entries (warmup, bad
//! input) are `f64::NAN`.
//!
//! Edge policy shared by every function:
//! - empty input → empty output
//! - `period == 0` → all-NaN, no panic
//! - `period > len` → all-NaN
//! - a non-finite input (NaN or ±Inf) is undefined at its own index and
//!   poisons only the windows that contain it; recursive indicators (EMA,
//!   RSI) re-seed after the bad point instead of staying NaN forever.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger, BollingerBands};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use sma::sma;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
