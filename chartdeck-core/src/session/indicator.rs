//! Indicator selection — the tagged variant an indicator list is made of.
//!
//! `IndicatorKind` is a closed enum; adding a kind extends the exhaustive
//! match in `IndicatorSpec::compute` and nothing else.

use serde::{Deserialize, Serialize};

use crate::indicators::{bollinger, ema, macd, rsi, sma};

/// Window parameter used when the user supplies none (or an invalid one).
pub const DEFAULT_PERIOD: usize = 20;

/// The supported indicator transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Bb,
    Macd,
}

impl IndicatorKind {
    /// Lowercase tag used in generated indicator ids.
    pub fn tag(self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Bb => "bb",
            IndicatorKind::Macd => "macd",
        }
    }

    /// Display label as shown in trace names.
    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Bb => "BB",
            IndicatorKind::Macd => "MACD",
        }
    }
}

/// One configured indicator inside a session.
///
/// `id` is unique within the owning session. `period` is always positive;
/// the coercion of absent/non-positive user input happens in [`IndicatorSpec::new`].
/// MACD carries a period like everything else but ignores it (fixed 12/26/9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub id: String,
    pub kind: IndicatorKind,
    pub period: usize,
}

/// Computed output of one indicator, shaped by how many traces it yields.
#[derive(Debug, Clone)]
pub enum IndicatorSeries {
    /// SMA, EMA, RSI: one line.
    Line(Vec<f64>),
    /// Bollinger Bands: upper and lower band lines.
    Band { upper: Vec<f64>, lower: Vec<f64> },
    /// MACD line plus its signal line.
    MacdPair { macd: Vec<f64>, signal: Vec<f64> },
}

impl IndicatorSpec {
    /// Build a spec, coercing an absent or non-positive requested period to
    /// [`DEFAULT_PERIOD`] instead of rejecting it.
    pub fn new(id: impl Into<String>, kind: IndicatorKind, requested_period: Option<i64>) -> Self {
        let period = match requested_period {
            Some(p) if p > 0 => p as usize,
            _ => DEFAULT_PERIOD,
        };
        Self {
            id: id.into(),
            kind,
            period,
        }
    }

    /// Compute this indicator over a close-price array.
    pub fn compute(&self, close: &[f64]) -> IndicatorSeries {
        match self.kind {
            IndicatorKind::Sma => IndicatorSeries::Line(sma(close, self.period)),
            IndicatorKind::Ema => IndicatorSeries::Line(ema(close, self.period)),
            IndicatorKind::Rsi => IndicatorSeries::Line(rsi(close, self.period)),
            IndicatorKind::Bb => {
                let bands = bollinger(close, self.period);
                IndicatorSeries::Band {
                    upper: bands.upper,
                    lower: bands.lower,
                }
            }
            IndicatorKind::Macd => {
                let out = macd(close);
                IndicatorSeries::MacdPair {
                    macd: out.macd,
                    signal: out.signal,
                }
            }
        }
    }
}
