//! The engine context — single owner of all dashboard state.
//!
//! `ChartEngine` replaces the original's module-level globals (current
//! session, range, toggles) with one explicit object. Mutations are
//! synchronous; each one starts a fresh fetch cycle. Responses come back
//! through `handle_response`, which enforces the staleness rule: a reply
//! whose tag doesn't match the pending cycle is dropped, never rendered.

use std::sync::mpsc::Sender;

use chartdeck_client::AnalyzerToggles;
use chartdeck_core::analysis::AnalysisOverlay;
use chartdeck_core::compose::{compose, ComposeInput, RenderMode};
use chartdeck_core::series::{PriceSeries, SeriesMeta};
use chartdeck_core::session::{IndicatorKind, SessionError, SessionId, SessionStore};

use crate::renderer::Renderer;
use crate::worker::{CycleTag, FetchCommand, FetchResponse};

/// In-flight cycle state: the tag its fetches carry plus the two result
/// slots. The model is emitted once both slots are filled.
#[derive(Debug)]
struct PendingCycle {
    tag: CycleTag,
    series: Option<PriceSeries>,
    overlay: Option<Option<AnalysisOverlay>>,
}

/// Single-owner engine state, driven by mutations, timer ticks, and fetch
/// responses.
pub struct ChartEngine {
    store: SessionStore,
    range: String,
    toggles: AnalyzerToggles,
    generation: u64,
    pending: Option<PendingCycle>,
    chart_initialized: bool,
    commands: Sender<FetchCommand>,
}

impl ChartEngine {
    pub fn new(commands: Sender<FetchCommand>, range: impl Into<String>, toggles: AnalyzerToggles) -> Self {
        Self {
            store: SessionStore::new(),
            range: range.into(),
            toggles,
            generation: 0,
            pending: None,
            chart_initialized: false,
            commands,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn range(&self) -> &str {
        &self.range
    }

    pub fn toggles(&self) -> AnalyzerToggles {
        self.toggles
    }

    pub fn has_pending_cycle(&self) -> bool {
        self.pending.is_some()
    }

    // ── Mutations (each one triggers an immediate refresh) ───────────

    pub fn create_session(
        &mut self,
        symbol: &str,
        exchange: &str,
    ) -> Result<SessionId, SessionError> {
        let id = self.store.create_session(symbol, exchange)?;
        self.refresh();
        Ok(id)
    }

    pub fn switch_session(&mut self, id: &SessionId) -> Result<(), SessionError> {
        self.store.switch_session(id)?;
        self.refresh();
        Ok(())
    }

    pub fn add_indicator(
        &mut self,
        kind: IndicatorKind,
        requested_period: Option<i64>,
    ) -> Result<String, SessionError> {
        let id = self.store.add_indicator(kind, requested_period)?;
        self.refresh();
        Ok(id)
    }

    pub fn remove_indicator(&mut self, indicator_id: &str) -> Result<bool, SessionError> {
        let removed = self.store.remove_indicator(indicator_id)?;
        self.refresh();
        Ok(removed)
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<bool, SessionError> {
        let applied = self.store.apply_preset(name)?;
        self.refresh();
        Ok(applied)
    }

    pub fn set_range(&mut self, range: impl Into<String>) {
        self.range = range.into();
        self.refresh();
    }

    pub fn set_toggles(&mut self, toggles: AnalyzerToggles) {
        self.toggles = toggles;
        self.refresh();
    }

    // ── Cycle lifecycle ──────────────────────────────────────────────

    /// Start a new fetch cycle for the active session.
    ///
    /// Any earlier cycle is abandoned: its in-flight responses will fail the
    /// tag check when they land. Called after every mutation and on every
    /// scheduler tick.
    pub fn refresh(&mut self) {
        let Some(session) = self.store.active() else {
            self.pending = None;
            return;
        };

        self.generation += 1;
        let tag = CycleTag {
            session: session.id.clone(),
            range: self.range.clone(),
            generation: self.generation,
        };
        let symbol = session.symbol.clone();
        let exchange = session.exchange.clone();

        self.pending = Some(PendingCycle {
            tag: tag.clone(),
            series: None,
            overlay: None,
        });

        let sent = self
            .commands
            .send(FetchCommand::Series {
                tag: tag.clone(),
                symbol: symbol.clone(),
                exchange: exchange.clone(),
            })
            .and_then(|_| {
                self.commands.send(FetchCommand::Analysis {
                    tag,
                    symbol,
                    exchange,
                    toggles: self.toggles,
                })
            });
        if sent.is_err() {
            tracing::warn!("fetch worker disconnected; refresh dropped");
            self.pending = None;
        }
    }

    /// Feed one fetch response into the engine.
    ///
    /// Returns `true` if a render model was emitted. Stale responses (wrong
    /// session, wrong range, or an older generation) are discarded here.
    pub fn handle_response(&mut self, response: FetchResponse, renderer: &mut dyn Renderer) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            tracing::debug!(tag = ?response.tag(), "discarding response with no pending cycle");
            return false;
        };
        if *response.tag() != pending.tag {
            tracing::debug!(
                stale = ?response.tag(),
                current = ?pending.tag,
                "discarding stale fetch response"
            );
            return false;
        }

        match response {
            FetchResponse::Series { result, .. } => {
                // A transport failure still renders: empty series, error status.
                let series = result.unwrap_or_else(|err| {
                    PriceSeries::empty(SeriesMeta::error(err.to_string()))
                });
                pending.series = Some(series);
            }
            FetchResponse::Analysis { result, .. } => {
                let overlay = match result {
                    Ok(overlay) => overlay,
                    Err(err) => {
                        // Overlay is additive; degrade silently (log only).
                        tracing::warn!(error = %err, "analysis fetch failed");
                        None
                    }
                };
                pending.overlay = Some(overlay);
            }
        }

        self.try_emit(renderer)
    }

    fn try_emit(&mut self, renderer: &mut dyn Renderer) -> bool {
        let Some(pending) = self.pending.as_ref() else {
            return false;
        };
        let (Some(series), Some(overlay)) = (&pending.series, &pending.overlay) else {
            return false;
        };
        let Some(session) = self.store.get(&pending.tag.session) else {
            return false;
        };

        let model = compose(&ComposeInput {
            session,
            range: &pending.tag.range,
            series,
            analysis: overlay.as_ref(),
        });

        let mode = if self.chart_initialized {
            RenderMode::Update
        } else {
            RenderMode::Create
        };
        renderer.render(&model, mode);
        self.chart_initialized = true;
        self.pending = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Renderer;
    use chartdeck_client::ApiError;
    use chartdeck_core::compose::RenderModel;
    use std::sync::mpsc::{self, Receiver};

    struct RecordingRenderer {
        frames: Vec<(RenderModel, RenderMode)>,
    }

    impl RecordingRenderer {
        fn new() -> Self {
            Self { frames: Vec::new() }
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, model: &RenderModel, mode: RenderMode) {
            self.frames.push((model.clone(), mode));
        }
    }

    fn engine() -> (ChartEngine, Receiver<FetchCommand>) {
        let (tx, rx) = mpsc::channel();
        (
            ChartEngine::new(tx, "1d", AnalyzerToggles::default()),
            rx,
        )
    }

    fn sample_series() -> PriceSeries {
        PriceSeries::new(
            vec![1, 2, 3],
            vec![10.0, 11.0, 12.0],
            vec![11.0, 12.0, 13.0],
            vec![9.0, 10.0, 11.0],
            vec![10.5, 11.5, 12.5],
            vec![100.0, 110.0, 120.0],
            SeriesMeta::ok(),
        )
        .unwrap()
    }

    fn issued_tag(rx: &Receiver<FetchCommand>) -> CycleTag {
        let cmd = rx.try_recv().expect("expected an issued command");
        let tag = cmd.tag().expect("non-shutdown command").clone();
        // The analysis command of the same pair carries the same tag.
        let second = rx.try_recv().expect("expected the paired command");
        assert_eq!(second.tag(), Some(&tag));
        tag
    }

    #[test]
    fn mutation_issues_tagged_fetch_pair() {
        let (mut engine, rx) = engine();
        engine.create_session("ATW", "CSEMA").unwrap();
        let tag = issued_tag(&rx);
        assert_eq!(tag.session.as_str(), "atw_csema");
        assert_eq!(tag.range, "1d");
        assert_eq!(tag.generation, 1);
    }

    #[test]
    fn emit_waits_for_both_slots() {
        let (mut engine, rx) = engine();
        engine.create_session("ATW", "CSEMA").unwrap();
        let tag = issued_tag(&rx);
        let mut renderer = RecordingRenderer::new();

        let emitted = engine.handle_response(
            FetchResponse::Series {
                tag: tag.clone(),
                result: Ok(sample_series()),
            },
            &mut renderer,
        );
        assert!(!emitted);
        assert!(renderer.frames.is_empty());

        let emitted = engine.handle_response(
            FetchResponse::Analysis {
                tag,
                result: Ok(None),
            },
            &mut renderer,
        );
        assert!(emitted);
        assert_eq!(renderer.frames.len(), 1);
    }

    #[test]
    fn first_emit_creates_then_updates() {
        let (mut engine, rx) = engine();
        engine.create_session("ATW", "CSEMA").unwrap();
        let tag = issued_tag(&rx);
        let mut renderer = RecordingRenderer::new();

        engine.handle_response(
            FetchResponse::Analysis {
                tag: tag.clone(),
                result: Ok(None),
            },
            &mut renderer,
        );
        engine.handle_response(
            FetchResponse::Series {
                tag,
                result: Ok(sample_series()),
            },
            &mut renderer,
        );
        assert_eq!(renderer.frames[0].1, RenderMode::Create);

        engine.refresh();
        let tag = issued_tag(&rx);
        engine.handle_response(
            FetchResponse::Series {
                tag: tag.clone(),
                result: Ok(sample_series()),
            },
            &mut renderer,
        );
        engine.handle_response(
            FetchResponse::Analysis {
                tag,
                result: Ok(None),
            },
            &mut renderer,
        );
        assert_eq!(renderer.frames.len(), 2);
        assert_eq!(renderer.frames[1].1, RenderMode::Update);
    }

    #[test]
    fn series_transport_failure_still_renders_error_status() {
        let (mut engine, rx) = engine();
        engine.create_session("ATW", "CSEMA").unwrap();
        let tag = issued_tag(&rx);
        let mut renderer = RecordingRenderer::new();

        engine.handle_response(
            FetchResponse::Series {
                tag: tag.clone(),
                result: Err(ApiError::Network("connection refused".into())),
            },
            &mut renderer,
        );
        engine.handle_response(
            FetchResponse::Analysis {
                tag,
                result: Ok(None),
            },
            &mut renderer,
        );

        let (model, _) = &renderer.frames[0];
        assert!(model.traces.is_empty());
        assert_eq!(model.layout.status.text, "(no data)");
        assert!(model
            .layout
            .status
            .detail
            .as_deref()
            .unwrap()
            .contains("connection refused"));
    }

    #[test]
    fn analysis_failure_degrades_silently() {
        let (mut engine, rx) = engine();
        engine.create_session("ATW", "CSEMA").unwrap();
        let tag = issued_tag(&rx);
        let mut renderer = RecordingRenderer::new();

        engine.handle_response(
            FetchResponse::Series {
                tag: tag.clone(),
                result: Ok(sample_series()),
            },
            &mut renderer,
        );
        let emitted = engine.handle_response(
            FetchResponse::Analysis {
                tag,
                result: Err(ApiError::Status(503)),
            },
            &mut renderer,
        );
        assert!(emitted);
        let (model, _) = &renderer.frames[0];
        assert_eq!(model.traces.len(), 2);
        assert!(model.layout.shapes.is_empty());
        assert_eq!(model.layout.status.text, "OK");
    }

    #[test]
    fn range_change_invalidates_older_cycle() {
        let (mut engine, rx) = engine();
        engine.create_session("ATW", "CSEMA").unwrap();
        let old_tag = issued_tag(&rx);
        engine.set_range("1w");
        let new_tag = issued_tag(&rx);
        let mut renderer = RecordingRenderer::new();

        assert!(!engine.handle_response(
            FetchResponse::Series {
                tag: old_tag,
                result: Ok(sample_series()),
            },
            &mut renderer,
        ));
        assert!(renderer.frames.is_empty());

        engine.handle_response(
            FetchResponse::Series {
                tag: new_tag.clone(),
                result: Ok(sample_series()),
            },
            &mut renderer,
        );
        engine.handle_response(
            FetchResponse::Analysis {
                tag: new_tag,
                result: Ok(None),
            },
            &mut renderer,
        );
        assert_eq!(renderer.frames.len(), 1);
        assert_eq!(renderer.frames[0].0.layout.title, "ATW/CSEMA (1w)");
    }

    #[test]
    fn refresh_without_session_is_inert() {
        let (mut engine, rx) = engine();
        engine.refresh();
        assert!(rx.try_recv().is_err());
        assert!(!engine.has_pending_cycle());
    }
}
