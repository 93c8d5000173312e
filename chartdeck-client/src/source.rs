//! Fetch traits the engine composes against.
//!
//! The engine never sees `reqwest`; it holds trait objects so tests can
//! substitute scripted sources. `ApiClient` implements both traits.

use serde::{Deserialize, Serialize};

use chartdeck_core::analysis::AnalysisOverlay;
use chartdeck_core::series::PriceSeries;

use crate::error::ApiError;

/// Analyzer feature toggles forwarded to the analysis and scan endpoints.
///
/// Persisted across restarts by the engine's settings store; all detectors
/// are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerToggles {
    pub rsi: bool,
    pub macd: bool,
    pub fib: bool,
    pub patterns: bool,
}

impl Default for AnalyzerToggles {
    fn default() -> Self {
        Self {
            rsi: true,
            macd: true,
            fib: true,
            patterns: true,
        }
    }
}

/// Supplies the primary OHLCV series for a (symbol, exchange, range) tuple.
pub trait DataSource: Send + Sync {
    fn fetch_series(
        &self,
        symbol: &str,
        exchange: &str,
        range: &str,
    ) -> Result<PriceSeries, ApiError>;
}

/// Supplies the score/pattern/fibonacci overlay for the same tuple.
///
/// `Ok(None)` means the server had nothing to say; the chart renders
/// without the overlay either way.
pub trait AnalysisClient: Send + Sync {
    fn fetch_overlay(
        &self,
        symbol: &str,
        exchange: &str,
        range: &str,
        toggles: &AnalyzerToggles,
    ) -> Result<Option<AnalysisOverlay>, ApiError>;
}
