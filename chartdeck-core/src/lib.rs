//! Chartdeck Core — the client-side charting engine.
//!
//! This crate contains the pure part of the dashboard engine:
//! - Price series model (parallel OHLCV arrays + freshness metadata)
//! - Indicator numerics (SMA, EMA, RSI, Bollinger Bands, MACD)
//! - Session store (independent symbol/exchange/indicator viewing contexts)
//! - Render-model composition (traces + layout handed to an external renderer)
//!
//! No I/O lives here. Fetching and scheduling belong to `chartdeck-client`
//! and `chartdeck-engine`.

pub mod analysis;
pub mod compose;
pub mod indicators;
pub mod series;
pub mod session;

pub use analysis::{AnalysisOverlay, FibLevels};
pub use compose::{compose, ComposeInput, RenderModel};
pub use series::{PriceSeries, SeriesMeta, SeriesStatus};
pub use session::{IndicatorKind, IndicatorSpec, Preset, Session, SessionError, SessionId, SessionStore};
