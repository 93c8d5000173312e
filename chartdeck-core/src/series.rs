//! Price series — parallel OHLCV arrays plus freshness metadata.
//!
//! The wire format is column-oriented: six equal-length arrays keyed by
//! `Time`/`Open`/`High`/`Low`/`Close`/`Volume`. Time values are epoch seconds.
//! Undefined prices are NaN; the indicator layer treats any non-finite value
//! as undefined.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Freshness/health state of a fetched series.
///
/// `Ok` includes the case where the server omitted the status field entirely.
/// Anything that is neither `ok` nor `error` is carried verbatim and shown
/// as-is in the status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStatus {
    Ok,
    Error,
    Stale,
    Other(String),
}

impl SeriesStatus {
    /// Map a wire status string (or its absence) onto the classification.
    pub fn from_wire(status: Option<&str>) -> Self {
        match status {
            None | Some("ok") => SeriesStatus::Ok,
            Some("error") => SeriesStatus::Error,
            Some("stale") => SeriesStatus::Stale,
            Some(other) => SeriesStatus::Other(other.to_string()),
        }
    }
}

/// Metadata attached to a price series by the data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub status: SeriesStatus,
    /// Epoch seconds (fractional); values above 1e12 are epoch milliseconds.
    pub last_updated: Option<f64>,
    pub message: Option<String>,
}

impl SeriesMeta {
    pub fn ok() -> Self {
        Self {
            status: SeriesStatus::Ok,
            last_updated: None,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SeriesStatus::Error,
            last_updated: None,
            message: Some(message.into()),
        }
    }
}

/// Errors raised when assembling a series from raw columns.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("ragged series: {column} has length {actual}, expected {expected}")]
    RaggedColumns {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// OHLCV series for one (symbol, exchange, range) fetch.
///
/// All six columns have identical length N >= 0. The series is transient:
/// it is recomputed on every compose cycle and never cached here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub time: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub meta: SeriesMeta,
}

impl PriceSeries {
    /// Assemble a series, rejecting ragged columns.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: Vec<i64>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
        meta: SeriesMeta,
    ) -> Result<Self, SeriesError> {
        let expected = time.len();
        let check = |column: &'static str, actual: usize| {
            if actual == expected {
                Ok(())
            } else {
                Err(SeriesError::RaggedColumns {
                    column,
                    expected,
                    actual,
                })
            }
        };
        check("Open", open.len())?;
        check("High", high.len())?;
        check("Low", low.len())?;
        check("Close", close.len())?;
        check("Volume", volume.len())?;
        Ok(Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            meta,
        })
    }

    /// An empty series carrying only metadata (fetch failures, loading state).
    pub fn empty(meta: SeriesMeta) -> Self {
        Self {
            time: Vec::new(),
            open: Vec::new(),
            high: Vec::new(),
            low: Vec::new(),
            close: Vec::new(),
            volume: Vec::new(),
            meta,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
