//! ML training endpoints.
//!
//! The backend trains a classifier over accumulated analysis snapshots and
//! user-labeled trade outcomes. Training with too few labels is an expected
//! answer, not a failure: the server reports the exact shortfall.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::ApiClient;

/// Classifier quality metrics reported after training.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub train_size: u64,
    pub test_size: u64,
}

/// Outcome of a `/train_model` call, keyed by the `status` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainOutcome {
    Success {
        metrics: ModelMetrics,
    },
    InsufficientData {
        min_required: u64,
        samples: u64,
    },
    Failed {
        #[serde(default)]
        message: Option<String>,
    },
}

/// `/model_info` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub status: String,
    #[serde(default)]
    pub metrics: Option<ModelMetrics>,
    #[serde(default)]
    pub label_count: Option<u64>,
}

/// User-labeled outcome of a trade, as the wire's 0/1 flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    Bad,
    Good,
}

impl TradeOutcome {
    pub fn as_flag(self) -> u8 {
        match self {
            TradeOutcome::Bad => 0,
            TradeOutcome::Good => 1,
        }
    }
}

impl ApiClient {
    /// Train the model on accumulated labels. Non-fatal shortfalls come back
    /// as `TrainOutcome::InsufficientData`.
    pub fn train_model(&self) -> Result<TrainOutcome, ApiError> {
        let body: Value = self.client.post(self.url("/train_model")).send()?.json()?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::ResponseFormat(format!("bad train response: {e}")))
    }

    /// Record a trade outcome label; returns the server's total label count.
    pub fn label_trade(
        &self,
        symbol: &str,
        date: NaiveDate,
        outcome: TradeOutcome,
    ) -> Result<u64, ApiError> {
        let body: Value = self
            .client
            .post(self.url(&format!("/label_trade/{symbol}")))
            .json(&json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "outcome": outcome.as_flag(),
            }))
            .send()?
            .json()?;
        body.get("total_labels")
            .and_then(Value::as_u64)
            .ok_or_else(|| ApiError::ResponseFormat("missing total_labels".into()))
    }

    /// Fetch current model status and metrics.
    pub fn model_info(&self) -> Result<ModelInfo, ApiError> {
        let body: Value = self.client.get(self.url("/model_info")).send()?.json()?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::ResponseFormat(format!("bad model info: {e}")))
    }
}
