//! Chartdeck Client — the HTTP boundary of the engine.
//!
//! Defines the `DataSource` and `AnalysisClient` traits the engine composes
//! against, plus the blocking `reqwest` implementation talking to the
//! dashboard backend (`/data`, `/analyze_cached`, the scanner and the ML
//! endpoints). Wire parsing is kept in pure functions so it can be tested
//! without a server.

pub mod error;
pub mod http;
pub mod ml;
pub mod scanner;
pub mod source;

pub use error::ApiError;
pub use http::ApiClient;
pub use ml::{ModelInfo, ModelMetrics, TradeOutcome, TrainOutcome};
pub use scanner::{MlScanRow, ScanRow};
pub use source::{AnalysisClient, AnalyzerToggles, DataSource};
