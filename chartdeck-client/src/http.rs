//! Blocking HTTP client for the dashboard backend.
//!
//! `/data` answers `{ "<range>": {Time,Open,High,Low,Close,Volume}, meta: {...} }`
//! on success, `{error: "..."}` on failure, and `{status: "loading", message}`
//! while a symbol is still being cached server-side. Parsing lives in free
//! functions over `serde_json::Value` so the shapes are testable offline.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use chartdeck_core::analysis::AnalysisOverlay;
use chartdeck_core::series::{PriceSeries, SeriesMeta, SeriesStatus};

use crate::error::ApiError;
use crate::source::{AnalysisClient, AnalyzerToggles, DataSource};

/// Raw column arrays as they appear under the range key.
#[derive(Debug, Deserialize)]
struct RawColumns {
    #[serde(rename = "Time")]
    time: Vec<i64>,
    #[serde(rename = "Open")]
    open: Vec<f64>,
    #[serde(rename = "High")]
    high: Vec<f64>,
    #[serde(rename = "Low")]
    low: Vec<f64>,
    #[serde(rename = "Close")]
    close: Vec<f64>,
    #[serde(rename = "Volume")]
    volume: Vec<f64>,
}

/// The `meta` block of a `/data` response.
#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    status: Option<String>,
    last_updated: Option<f64>,
    message: Option<String>,
    last_error: Option<String>,
}

/// Client for every backend endpoint the engine consumes.
pub struct ApiClient {
    base_url: String,
    pub(crate) client: reqwest::blocking::Client,
}

impl ApiClient {
    /// Build a client for `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl DataSource for ApiClient {
    fn fetch_series(
        &self,
        symbol: &str,
        exchange: &str,
        range: &str,
    ) -> Result<PriceSeries, ApiError> {
        let body: Value = self
            .client
            .get(self.url("/data"))
            .query(&[("symbol", symbol), ("exchange", exchange), ("range", range)])
            .send()?
            .json()?;
        parse_data_body(&body, range)
    }
}

impl AnalysisClient for ApiClient {
    fn fetch_overlay(
        &self,
        symbol: &str,
        exchange: &str,
        range: &str,
        toggles: &AnalyzerToggles,
    ) -> Result<Option<AnalysisOverlay>, ApiError> {
        let resp = self
            .client
            .get(self.url("/analyze_cached"))
            .query(&[("symbol", symbol), ("exchange", exchange), ("range", range)])
            .query(&[
                ("rsi", toggles.rsi),
                ("macd", toggles.macd),
                ("fib", toggles.fib),
                ("patterns", toggles.patterns),
            ])
            .send()?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        let body: Value = resp.json()?;
        parse_overlay_body(&body)
    }
}

/// Parse a `/data` body into a series.
///
/// Server-reported errors become `ApiError::Server`; a body without the
/// requested range (the "loading" answer) becomes an empty series carrying
/// the verbatim status and message.
pub fn parse_data_body(body: &Value, range: &str) -> Result<PriceSeries, ApiError> {
    if let Some(err) = body.get("error").and_then(Value::as_str) {
        return Err(ApiError::Server(err.to_string()));
    }

    let meta: RawMeta = match body.get("meta") {
        Some(node) => serde_json::from_value(node.clone())
            .map_err(|e| ApiError::ResponseFormat(format!("bad meta block: {e}")))?,
        None => RawMeta::default(),
    };

    let Some(payload) = body.get(range) else {
        // No columns yet: surface whatever status the server sent verbatim.
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .or(meta.status.as_deref());
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or(meta.message.clone());
        return Ok(PriceSeries::empty(SeriesMeta {
            status: SeriesStatus::from_wire(status),
            last_updated: meta.last_updated,
            message,
        }));
    };

    let columns: RawColumns = serde_json::from_value(payload.clone())
        .map_err(|e| ApiError::ResponseFormat(format!("bad column arrays: {e}")))?;

    let series_meta = SeriesMeta {
        status: SeriesStatus::from_wire(meta.status.as_deref()),
        last_updated: meta.last_updated,
        message: meta.message.or(meta.last_error),
    };

    PriceSeries::new(
        columns.time,
        columns.open,
        columns.high,
        columns.low,
        columns.close,
        columns.volume,
        series_meta,
    )
    .map_err(|e| ApiError::ResponseFormat(e.to_string()))
}

/// Parse an `/analyze_cached` body.
///
/// The overlay sits under `analysis` but older servers answered flat;
/// accept both. A vacant overlay reads as `None`.
pub fn parse_overlay_body(body: &Value) -> Result<Option<AnalysisOverlay>, ApiError> {
    if let Some(err) = body.get("error").and_then(Value::as_str) {
        return Err(ApiError::Server(err.to_string()));
    }

    let node = body.get("analysis").unwrap_or(body);
    let overlay: AnalysisOverlay = serde_json::from_value(node.clone())
        .map_err(|e| ApiError::ResponseFormat(format!("bad analysis block: {e}")))?;

    Ok(if overlay.is_vacant() {
        None
    } else {
        Some(overlay)
    })
}
