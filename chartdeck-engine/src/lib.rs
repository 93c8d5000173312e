//! Chartdeck Engine — the composition root.
//!
//! Owns the state the original kept in module-level globals: the session
//! store, the selected range, and the analyzer toggles all live in
//! [`ChartEngine`], which is driven by three inputs:
//! - user mutations (create/switch session, indicator edits, presets)
//! - the periodic [`RefreshScheduler`] tick
//! - fetch responses coming back from the worker thread
//!
//! Every fetch pair is tagged with the cycle that issued it; responses whose
//! tag no longer matches are discarded instead of rendered, so a slow reply
//! for a session the user already left can never overwrite the current view.

pub mod config;
pub mod engine;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod worker;

pub use config::{ConfigError, EngineConfig};
pub use engine::ChartEngine;
pub use renderer::{Renderer, StatusLineRenderer};
pub use scheduler::RefreshScheduler;
pub use settings::SettingsStore;
pub use worker::{spawn_fetcher, CycleTag, FetchCommand, FetchResponse};
