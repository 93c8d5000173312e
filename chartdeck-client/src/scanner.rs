//! Market scanner endpoints.
//!
//! `/scan` scores every symbol already in the server cache (fast, no new
//! fetches); `/scan_warmup` pre-loads the cache fire-and-forget;
//! `/scan_with_ml` adds the trained model's prediction per row. The server
//! returns rows sorted by score descending; wire order is preserved.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::source::AnalyzerToggles;

/// One `/scan` result row.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRow {
    pub symbol: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub macd_cross: Option<bool>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<f64>,
}

/// One `/scan_with_ml` result row.
#[derive(Debug, Clone, Deserialize)]
pub struct MlScanRow {
    pub symbol: String,
    #[serde(default)]
    pub score: Option<f64>,
    /// 1 = good, 0 = bad, absent when no model is trained.
    #[serde(default)]
    pub ml_prediction: Option<i64>,
    #[serde(default)]
    pub ml_confidence: Option<f64>,
    #[serde(default)]
    pub combined_score: Option<f64>,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub macd_cross: Option<bool>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

fn parse_results<T: serde::de::DeserializeOwned>(body: &Value) -> Result<Vec<T>, ApiError> {
    let results = body
        .get("results")
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(results)
        .map_err(|e| ApiError::ResponseFormat(format!("bad scan results: {e}")))
}

impl ApiClient {
    /// Scan cached symbols with the heuristic scorer.
    pub fn scan(&self, range: &str, toggles: &AnalyzerToggles) -> Result<Vec<ScanRow>, ApiError> {
        let resp = self
            .client
            .get(self.url("/scan"))
            .query(&[("range", range)])
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
        parse_results(&body)
    }

    /// Kick off server-side cache warmup. The response body is ignored.
    pub fn scan_warmup(&self) -> Result<(), ApiError> {
        self.client.post(self.url("/scan_warmup")).send()?;
        Ok(())
    }

    /// Scan cached symbols with both heuristic and ML scores.
    pub fn scan_with_ml(&self, range: &str) -> Result<Vec<MlScanRow>, ApiError> {
        let resp = self
            .client
            .get(self.url("/scan_with_ml"))
            .query(&[("range", range)])
            .send()?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        let body: Value = resp.json()?;
        parse_results(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scan_rows_parse_with_missing_fields() {
        let body = json!({
            "range": "1d",
            "results": [
                {"symbol": "ATW", "score": 0.78, "trend": "bull", "rsi": 28.4,
                 "macd_cross": true, "patterns": ["hammer"], "last_updated": 1700000000.0},
                {"symbol": "GTM", "score": null, "trend": null}
            ],
            "cached_symbols": 2
        });
        let rows: Vec<ScanRow> = parse_results(&body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "ATW");
        assert_eq!(rows[0].score, Some(0.78));
        assert!(rows[0].macd_cross.unwrap());
        assert_eq!(rows[1].score, None);
        assert!(rows[1].patterns.is_empty());
    }

    #[test]
    fn ml_rows_parse() {
        let body = json!({
            "results": [
                {"symbol": "ATW", "score": 0.6, "ml_prediction": 1,
                 "ml_confidence": 0.83, "combined_score": 0.69, "trend": "bull"},
                {"symbol": "CIH", "score": 0.4, "ml_prediction": null}
            ]
        });
        let rows: Vec<MlScanRow> = parse_results(&body).unwrap();
        assert_eq!(rows[0].ml_prediction, Some(1));
        assert_eq!(rows[0].combined_score, Some(0.69));
        assert_eq!(rows[1].ml_prediction, None);
    }

    #[test]
    fn missing_results_key_is_empty() {
        let rows: Vec<ScanRow> = parse_results(&json!({"range": "1d"})).unwrap();
        assert!(rows.is_empty());
    }
}
