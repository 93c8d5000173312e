//! The render model — declarative traces + layout handed to the renderer.
//!
//! The renderer is an external collaborator; everything here is plain data
//! and serializable. Undefined numeric entries stay NaN (serde_json emits
//! them as null, which is what gap-aware plotting libraries expect).

use serde::{Deserialize, Serialize};

/// Vertical axis slot a trace is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Shared by candlesticks and price overlays (SMA/EMA/BB, fib lines).
    Price,
    Volume,
    /// Oscillator pane, fixed to [0, 100].
    Rsi,
    Macd,
}

impl Axis {
    /// Fixed display range, if this axis has one.
    pub fn fixed_range(self) -> Option<(f64, f64)> {
        match self {
            Axis::Rsi => Some((0.0, 100.0)),
            _ => None,
        }
    }
}

/// Per-bar volume coloring: close at or above open is an up bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dotted,
}

/// One drawable series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Candlestick {
        name: String,
        time: Vec<i64>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        /// Carried for hover display alongside the candles.
        volume: Vec<f64>,
    },
    VolumeBars {
        name: String,
        time: Vec<i64>,
        volume: Vec<f64>,
        directions: Vec<BarDirection>,
    },
    Line {
        name: String,
        axis: Axis,
        time: Vec<i64>,
        values: Vec<f64>,
        style: LineStyle,
    },
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick { name, .. }
            | Trace::VolumeBars { name, .. }
            | Trace::Line { name, .. } => name,
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Trace::Candlestick { .. } => Axis::Price,
            Trace::VolumeBars { .. } => Axis::Volume,
            Trace::Line { axis, .. } => *axis,
        }
    }
}

/// Severity coloring of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTone {
    Ok,
    Error,
    Stale,
    Neutral,
}

/// The three-field status strip: `ATW/CSEMA`, state text, detail line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBlock {
    pub header: String,
    pub tone: StatusTone,
    pub text: String,
    pub detail: Option<String>,
}

/// Horizontal level line on the price axis (fibonacci levels).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLine {
    pub label: String,
    pub price: f64,
    pub x0: i64,
    pub x1: i64,
}

/// Free-floating text pinned to the chart's top-right corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub status: StatusBlock,
    pub shapes: Vec<LevelLine>,
    pub annotations: Vec<Annotation>,
}

/// Complete description of one chart frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderModel {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

/// Whether the renderer should build the chart from scratch or patch the
/// one it already holds. The first emit for a widget is Create; everything
/// after is Update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    Create,
    Update,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_values_serialize_as_null() {
        let trace = Trace::Line {
            name: "SMA(3)".into(),
            axis: Axis::Price,
            time: vec![1, 2, 3],
            values: vec![f64::NAN, f64::NAN, 11.0],
            style: LineStyle::Solid,
        };
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["values"][0], serde_json::Value::Null);
        assert_eq!(json["values"][2], 11.0);
    }

    #[test]
    fn status_block_serialization_roundtrip() {
        let status = StatusBlock {
            header: "ATW/CSEMA".into(),
            tone: StatusTone::Stale,
            text: "Score: 0.50".into(),
            detail: Some("Patterns: doji".into()),
        };
        let json = serde_json::to_string(&status).unwrap();
        let back: StatusBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tone, StatusTone::Stale);
        assert_eq!(back.text, status.text);
        assert_eq!(back.detail, status.detail);
    }

    #[test]
    fn trace_axis_defaults() {
        let trace = Trace::Candlestick {
            name: "Price".into(),
            time: vec![],
            open: vec![],
            high: vec![],
            low: vec![],
            close: vec![],
            volume: vec![],
        };
        assert_eq!(trace.axis(), Axis::Price);
        assert_eq!(Axis::Volume.fixed_range(), None);
    }
}
