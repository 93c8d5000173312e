//! Viewing sessions — independent symbol/exchange/indicator contexts.
//!
//! A session is the engine-side model of one dashboard tab. The store keeps
//! every session alive for the process lifetime and tracks the single active
//! one; all indicator mutations apply to the active session only.

pub mod indicator;
pub mod preset;
pub mod store;

pub use indicator::{IndicatorKind, IndicatorSeries, IndicatorSpec, DEFAULT_PERIOD};
pub use preset::Preset;
pub use store::{Session, SessionError, SessionId, SessionStore};
