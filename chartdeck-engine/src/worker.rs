//! Background fetch worker — all network I/O runs here.
//!
//! Communication with the engine thread is via `mpsc` channels. Commands
//! carry the [`CycleTag`] of the cycle that issued them; the worker echoes
//! the tag back on the response so the engine can discard replies that
//! outlived their cycle.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chartdeck_client::{AnalysisClient, AnalyzerToggles, ApiError, DataSource};
use chartdeck_core::analysis::AnalysisOverlay;
use chartdeck_core::series::PriceSeries;
use chartdeck_core::session::SessionId;

/// Identity of one compose cycle: which session and range the fetches were
/// issued for, and a generation counter that invalidates earlier cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleTag {
    pub session: SessionId,
    pub range: String,
    pub generation: u64,
}

/// Commands sent from the engine to the worker.
#[derive(Debug)]
pub enum FetchCommand {
    Series {
        tag: CycleTag,
        symbol: String,
        exchange: String,
    },
    Analysis {
        tag: CycleTag,
        symbol: String,
        exchange: String,
        toggles: AnalyzerToggles,
    },
    Shutdown,
}

impl FetchCommand {
    pub fn tag(&self) -> Option<&CycleTag> {
        match self {
            FetchCommand::Series { tag, .. } | FetchCommand::Analysis { tag, .. } => Some(tag),
            FetchCommand::Shutdown => None,
        }
    }
}

/// Responses sent from the worker back to the engine.
#[derive(Debug)]
pub enum FetchResponse {
    Series {
        tag: CycleTag,
        result: Result<PriceSeries, ApiError>,
    },
    Analysis {
        tag: CycleTag,
        result: Result<Option<AnalysisOverlay>, ApiError>,
    },
}

impl FetchResponse {
    pub fn tag(&self) -> &CycleTag {
        match self {
            FetchResponse::Series { tag, .. } | FetchResponse::Analysis { tag, .. } => tag,
        }
    }
}

/// Spawn the fetch worker thread.
///
/// The worker exits when it receives `Shutdown`, when the command sender is
/// dropped, or when the engine stops listening for responses.
pub fn spawn_fetcher(
    data: Arc<dyn DataSource>,
    analysis: Arc<dyn AnalysisClient>,
    commands: Receiver<FetchCommand>,
    responses: Sender<FetchResponse>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(command) = commands.recv() {
            let response = match command {
                FetchCommand::Series {
                    tag,
                    symbol,
                    exchange,
                } => {
                    let result = data.fetch_series(&symbol, &exchange, &tag.range);
                    FetchResponse::Series { tag, result }
                }
                FetchCommand::Analysis {
                    tag,
                    symbol,
                    exchange,
                    toggles,
                } => {
                    let result = analysis.fetch_overlay(&symbol, &exchange, &tag.range, &toggles);
                    FetchResponse::Analysis { tag, result }
                }
                FetchCommand::Shutdown => break,
            };
            if responses.send(response).is_err() {
                break;
            }
        }
    })
}
