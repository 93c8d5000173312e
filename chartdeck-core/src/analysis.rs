//! Server-computed analysis overlay.
//!
//! Strictly additive to the chart: a missing or failed overlay never blocks
//! rendering. Fibonacci levels use an ordered map so shape order is stable
//! across cycles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fibonacci retracement levels keyed by label (e.g. "0.382").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FibLevels {
    pub levels: BTreeMap<String, f64>,
}

/// Pattern/score/fibonacci payload from the analysis endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOverlay {
    /// Composite score in [0, 1].
    pub score: Option<f64>,
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Older backends spell this field out as `fibonacci`.
    #[serde(alias = "fibonacci")]
    pub fib: Option<FibLevels>,
}

impl AnalysisOverlay {
    /// True when the overlay would not change the render model at all.
    pub fn is_vacant(&self) -> bool {
        self.score.is_none() && self.patterns.is_empty() && self.fib.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_overlay_is_vacant() {
        assert!(AnalysisOverlay::default().is_vacant());
    }

    #[test]
    fn score_makes_overlay_non_vacant() {
        let overlay = AnalysisOverlay {
            score: Some(0.7),
            ..Default::default()
        };
        assert!(!overlay.is_vacant());
    }
}
