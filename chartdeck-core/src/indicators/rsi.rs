//! Relative Strength Index (RSI), Wilder smoothing.
//!
//! Per-step gain = max(close[i] - close[i-1], 0), loss = max(close[i-1] - close[i], 0).
//! Seed: simple mean of the first `period` gains/losses (deltas 1..=period).
//! Then avg = (avg * (period-1) + current) / period.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss); avg_loss == 0 → 100.
//! First valid value at index `period`. Output range [0, 100].

/// Compute the RSI of `close` over `period`.
pub fn rsi(close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    let mut avg_gain = f64::NAN;
    let mut avg_loss = f64::NAN;
    let mut seed_gain = 0.0;
    let mut seed_loss = 0.0;
    let mut seed_run = 0usize;

    for i in 1..n {
        let curr = close[i];
        let prev = close[i - 1];
        if !curr.is_finite() || !prev.is_finite() {
            // Bad delta: drop the running averages and re-seed.
            avg_gain = f64::NAN;
            avg_loss = f64::NAN;
            seed_gain = 0.0;
            seed_loss = 0.0;
            seed_run = 0;
            continue;
        }

        let change = curr - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if avg_gain.is_finite() {
            avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
            avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
            out[i] = rsi_value(avg_gain, avg_loss);
        } else {
            seed_gain += gain;
            seed_loss += loss;
            seed_run += 1;
            if seed_run == period {
                avg_gain = seed_gain / period as f64;
                avg_loss = seed_loss / period as f64;
                out[i] = rsi_value(avg_gain, avg_loss);
                seed_gain = 0.0;
                seed_loss = 0.0;
                seed_run = 0;
            }
        }
    }

    out
}

/// Zero average loss is pinned to 100 (an all-equal series reads as 100).
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
