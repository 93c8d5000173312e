//! Chart composition — one render model per cycle.
//!
//! Pure: the composer reads the active session, the fetched series, and an
//! optional analysis overlay, and produces the full trace/layout description.
//! Create-vs-update mode is engine state and lives outside this module.

pub mod model;

pub use model::{
    Annotation, Axis, BarDirection, Layout, LevelLine, LineStyle, RenderMode, RenderModel,
    StatusBlock, StatusTone, Trace,
};

use chrono::DateTime;

use crate::analysis::AnalysisOverlay;
use crate::series::{PriceSeries, SeriesStatus};
use crate::session::{IndicatorKind, IndicatorSeries, Session};

/// Everything one compose cycle reads.
#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    pub session: &'a Session,
    pub range: &'a str,
    pub series: &'a PriceSeries,
    pub analysis: Option<&'a AnalysisOverlay>,
}

/// Build the render model for one cycle.
///
/// An empty series short-circuits to a status-only model. The analysis
/// overlay is strictly additive: fib level lines, a score annotation that
/// overrides the status text, and a pattern list in the detail line.
pub fn compose(input: &ComposeInput) -> RenderModel {
    let session = input.session;
    let series = input.series;
    let header = format!("{}/{}", session.symbol, session.exchange);
    let title = format!("{}/{} ({})", session.symbol, session.exchange, input.range);

    if series.is_empty() {
        return RenderModel {
            traces: Vec::new(),
            layout: Layout {
                title,
                status: StatusBlock {
                    header,
                    tone: StatusTone::Error,
                    text: "(no data)".to_string(),
                    detail: series.meta.message.clone(),
                },
                shapes: Vec::new(),
                annotations: Vec::new(),
            },
        };
    }

    let mut status = StatusBlock {
        header,
        tone: status_tone(&series.meta.status),
        text: status_text(series),
        detail: series.meta.last_updated.and_then(format_last_updated),
    };

    let mut traces = Vec::with_capacity(2 + session.indicators.len() * 2);

    traces.push(Trace::Candlestick {
        name: "Price".to_string(),
        time: series.time.clone(),
        open: series.open.clone(),
        high: series.high.clone(),
        low: series.low.clone(),
        close: series.close.clone(),
        volume: series.volume.clone(),
    });

    let directions = series
        .close
        .iter()
        .zip(series.open.iter())
        .map(|(c, o)| {
            if c >= o {
                BarDirection::Up
            } else {
                BarDirection::Down
            }
        })
        .collect();
    traces.push(Trace::VolumeBars {
        name: "Volume".to_string(),
        time: series.time.clone(),
        volume: series.volume.clone(),
        directions,
    });

    for spec in &session.indicators {
        match spec.compute(&series.close) {
            IndicatorSeries::Line(values) => {
                let axis = if spec.kind == IndicatorKind::Rsi {
                    Axis::Rsi
                } else {
                    Axis::Price
                };
                traces.push(Trace::Line {
                    name: format!("{}({})", spec.kind.label(), spec.period),
                    axis,
                    time: series.time.clone(),
                    values,
                    style: LineStyle::Solid,
                });
            }
            IndicatorSeries::Band { upper, lower } => {
                traces.push(Trace::Line {
                    name: format!("BB Upper({})", spec.period),
                    axis: Axis::Price,
                    time: series.time.clone(),
                    values: upper,
                    style: LineStyle::Dotted,
                });
                traces.push(Trace::Line {
                    name: format!("BB Lower({})", spec.period),
                    axis: Axis::Price,
                    time: series.time.clone(),
                    values: lower,
                    style: LineStyle::Dotted,
                });
            }
            IndicatorSeries::MacdPair { macd, signal } => {
                traces.push(Trace::Line {
                    name: "MACD".to_string(),
                    axis: Axis::Macd,
                    time: series.time.clone(),
                    values: macd,
                    style: LineStyle::Solid,
                });
                traces.push(Trace::Line {
                    name: "Signal".to_string(),
                    axis: Axis::Macd,
                    time: series.time.clone(),
                    values: signal,
                    style: LineStyle::Solid,
                });
            }
        }
    }

    let mut shapes = Vec::new();
    let mut annotations = Vec::new();

    if let Some(analysis) = input.analysis {
        if let Some(fib) = &analysis.fib {
            let x0 = series.time[0];
            let x1 = series.time[series.len() - 1];
            for (label, &price) in &fib.levels {
                shapes.push(LevelLine {
                    label: label.clone(),
                    price,
                    x0,
                    x1,
                });
            }
        }

        if let Some(score) = analysis.score {
            let text = format!("Score: {score:.2}");
            status.text = text.clone();
            status.tone = if score > 0.6 {
                StatusTone::Ok
            } else if score < 0.4 {
                StatusTone::Error
            } else {
                StatusTone::Stale
            };
            annotations.push(Annotation { text });
        }

        if !analysis.patterns.is_empty() {
            status.detail = Some(format!("Patterns: {}", analysis.patterns.join(", ")));
        }
    }

    RenderModel {
        traces,
        layout: Layout {
            title,
            status,
            shapes,
            annotations,
        },
    }
}

fn status_tone(status: &SeriesStatus) -> StatusTone {
    match status {
        SeriesStatus::Ok => StatusTone::Ok,
        SeriesStatus::Error => StatusTone::Error,
        SeriesStatus::Stale => StatusTone::Stale,
        SeriesStatus::Other(_) => StatusTone::Neutral,
    }
}

/// `ok` reads "OK", `error` reads the server message, anything else verbatim.
fn status_text(series: &PriceSeries) -> String {
    match &series.meta.status {
        SeriesStatus::Ok => "OK".to_string(),
        SeriesStatus::Error => series
            .meta
            .message
            .clone()
            .unwrap_or_else(|| "Error".to_string()),
        SeriesStatus::Stale => "stale".to_string(),
        SeriesStatus::Other(text) => text.clone(),
    }
}

/// Render `last_updated` epoch seconds as a human timestamp; values above
/// 1e12 are epoch milliseconds.
fn format_last_updated(raw: f64) -> Option<String> {
    if !raw.is_finite() {
        return None;
    }
    let secs = if raw > 1e12 { raw / 1000.0 } else { raw };
    DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| format!("Updated: {}", dt.format("%Y-%m-%d %H:%M:%S")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesMeta;
    use crate::session::{IndicatorKind, SessionStore};

    fn sample_series(n: usize) -> PriceSeries {
        let time: Vec<i64> = (0..n as i64).map(|i| 1_700_000_000 + i * 86_400).collect();
        let close: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let open: Vec<f64> = close.iter().map(|c| c - 0.5).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = open.iter().map(|o| o - 1.0).collect();
        let volume: Vec<f64> = (0..n).map(|i| 1000.0 + i as f64).collect();
        PriceSeries::new(time, open, high, low, close, volume, SeriesMeta::ok()).unwrap()
    }

    fn store_with_session() -> SessionStore {
        let mut store = SessionStore::new();
        store.create_session("ATW", "CSEMA").unwrap();
        store
    }

    #[test]
    fn empty_series_yields_status_only_model() {
        let store = store_with_session();
        let series = PriceSeries::empty(SeriesMeta::error("fetch failed"));
        let model = compose(&ComposeInput {
            session: store.active().unwrap(),
            range: "1d",
            series: &series,
            analysis: None,
        });
        assert!(model.traces.is_empty());
        assert_eq!(model.layout.status.text, "(no data)");
        assert_eq!(model.layout.status.tone, StatusTone::Error);
        assert_eq!(model.layout.status.detail.as_deref(), Some("fetch failed"));
    }

    #[test]
    fn base_model_has_candles_then_volume() {
        let store = store_with_session();
        let series = sample_series(10);
        let model = compose(&ComposeInput {
            session: store.active().unwrap(),
            range: "1d",
            series: &series,
            analysis: None,
        });
        assert_eq!(model.traces.len(), 2);
        assert_eq!(model.traces[0].name(), "Price");
        assert_eq!(model.traces[1].name(), "Volume");
        assert_eq!(model.layout.status.text, "OK");
        assert_eq!(model.layout.title, "ATW/CSEMA (1d)");
    }

    #[test]
    fn volume_directions_follow_close_vs_open() {
        let store = store_with_session();
        let mut series = sample_series(3);
        series.open = vec![10.0, 10.0, 10.0];
        series.close = vec![11.0, 9.0, 10.0];
        let model = compose(&ComposeInput {
            session: store.active().unwrap(),
            range: "1d",
            series: &series,
            analysis: None,
        });
        match &model.traces[1] {
            Trace::VolumeBars { directions, .. } => {
                assert_eq!(
                    directions,
                    &vec![BarDirection::Up, BarDirection::Down, BarDirection::Up]
                );
            }
            other => panic!("expected volume bars, got {other:?}"),
        }
    }

    #[test]
    fn indicator_traces_in_list_order_with_axis_slots() {
        let mut store = store_with_session();
        store.add_indicator(IndicatorKind::Sma, Some(3)).unwrap();
        store.add_indicator(IndicatorKind::Rsi, Some(3)).unwrap();
        store.add_indicator(IndicatorKind::Bb, Some(3)).unwrap();
        store.add_indicator(IndicatorKind::Macd, None).unwrap();

        let series = sample_series(50);
        let model = compose(&ComposeInput {
            session: store.active().unwrap(),
            range: "1w",
            series: &series,
            analysis: None,
        });

        let names: Vec<_> = model.traces.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Price",
                "Volume",
                "SMA(3)",
                "RSI(3)",
                "BB Upper(3)",
                "BB Lower(3)",
                "MACD",
                "Signal"
            ]
        );
        assert_eq!(model.traces[2].axis(), Axis::Price);
        assert_eq!(model.traces[3].axis(), Axis::Rsi);
        assert_eq!(model.traces[4].axis(), Axis::Price);
        assert_eq!(model.traces[6].axis(), Axis::Macd);
        assert_eq!(model.traces[7].axis(), Axis::Macd);
        assert_eq!(Axis::Rsi.fixed_range(), Some((0.0, 100.0)));
    }

    #[test]
    fn error_status_shows_server_message() {
        let store = store_with_session();
        let mut series = sample_series(5);
        series.meta = SeriesMeta::error("quota exceeded");
        let model = compose(&ComposeInput {
            session: store.active().unwrap(),
            range: "1d",
            series: &series,
            analysis: None,
        });
        assert_eq!(model.layout.status.text, "quota exceeded");
        assert_eq!(model.layout.status.tone, StatusTone::Error);
    }

    #[test]
    fn unknown_status_shown_verbatim() {
        let store = store_with_session();
        let mut series = sample_series(5);
        series.meta.status = SeriesStatus::Other("loading".into());
        let model = compose(&ComposeInput {
            session: store.active().unwrap(),
            range: "1d",
            series: &series,
            analysis: None,
        });
        assert_eq!(model.layout.status.text, "loading");
        assert_eq!(model.layout.status.tone, StatusTone::Neutral);
    }

    #[test]
    fn last_updated_seconds_and_millis() {
        assert_eq!(
            format_last_updated(1_700_000_000.0).as_deref(),
            Some("Updated: 2023-11-14 22:13:20")
        );
        // Millisecond timestamps collapse to the same instant.
        assert_eq!(
            format_last_updated(1_700_000_000_000.0),
            format_last_updated(1_700_000_000.0)
        );
    }

    #[test]
    fn analysis_overlay_is_additive() {
        use crate::analysis::{AnalysisOverlay, FibLevels};
        use std::collections::BTreeMap;

        let store = store_with_session();
        let series = sample_series(10);

        let mut levels = BTreeMap::new();
        levels.insert("0.382".to_string(), 98.5);
        levels.insert("0.618".to_string(), 102.5);
        let overlay = AnalysisOverlay {
            score: Some(0.72),
            patterns: vec!["hammer".into(), "doji".into()],
            fib: Some(FibLevels { levels }),
        };

        let model = compose(&ComposeInput {
            session: store.active().unwrap(),
            range: "1d",
            series: &series,
            analysis: Some(&overlay),
        });

        assert_eq!(model.layout.shapes.len(), 2);
        assert_eq!(model.layout.shapes[0].x0, series.time[0]);
        assert_eq!(model.layout.shapes[0].x1, series.time[series.len() - 1]);
        assert_eq!(model.layout.status.text, "Score: 0.72");
        assert_eq!(model.layout.status.tone, StatusTone::Ok);
        assert_eq!(model.layout.annotations.len(), 1);
        assert_eq!(
            model.layout.status.detail.as_deref(),
            Some("Patterns: hammer, doji")
        );
    }

    #[test]
    fn score_tone_thresholds() {
        use crate::analysis::AnalysisOverlay;

        let store = store_with_session();
        let series = sample_series(5);
        let tone_for = |score: f64| {
            let overlay = AnalysisOverlay {
                score: Some(score),
                ..Default::default()
            };
            compose(&ComposeInput {
                session: store.active().unwrap(),
                range: "1d",
                series: &series,
                analysis: Some(&overlay),
            })
            .layout
            .status
            .tone
        };
        assert_eq!(tone_for(0.8), StatusTone::Ok);
        assert_eq!(tone_for(0.5), StatusTone::Stale);
        assert_eq!(tone_for(0.2), StatusTone::Error);
    }

    #[test]
    fn missing_analysis_still_emits_model() {
        let mut store = store_with_session();
        store.add_indicator(IndicatorKind::Sma, Some(3)).unwrap();
        let series = sample_series(10);
        let model = compose(&ComposeInput {
            session: store.active().unwrap(),
            range: "1d",
            series: &series,
            analysis: None,
        });
        assert_eq!(model.traces.len(), 3);
        assert!(model.layout.shapes.is_empty());
        assert!(model.layout.annotations.is_empty());
    }
}
