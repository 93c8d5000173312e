//! Named indicator presets.
//!
//! A preset replaces the active session's indicator list wholesale.

use super::indicator::IndicatorKind;

/// The fixed preset catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Empty list.
    Default,
    /// SMA 20 + RSI 14.
    MaRsi,
    /// SMA 20, EMA 20, RSI 14, BB 20.
    Full,
}

impl Preset {
    /// Resolve a preset by its user-facing name. Unknown names yield `None`
    /// (the store treats that as a no-op).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Default" => Some(Preset::Default),
            "MA+RSI" => Some(Preset::MaRsi),
            "Full" => Some(Preset::Full),
            _ => None,
        }
    }

    /// The (kind, period) pairs this preset expands to, in display order.
    pub fn entries(self) -> &'static [(IndicatorKind, i64)] {
        match self {
            Preset::Default => &[],
            Preset::MaRsi => &[(IndicatorKind::Sma, 20), (IndicatorKind::Rsi, 14)],
            Preset::Full => &[
                (IndicatorKind::Sma, 20),
                (IndicatorKind::Ema, 20),
                (IndicatorKind::Rsi, 14),
                (IndicatorKind::Bb, 20),
            ],
        }
    }
}
