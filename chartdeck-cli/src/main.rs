//! Chartdeck CLI — drive the dashboard engine headlessly.
//!
//! Commands:
//! - `watch` — run the full engine loop (worker, scheduler, status-line renderer)
//! - `snapshot` — one compose cycle, render model printed as JSON
//! - `scan` — score cached symbols (heuristic or ML)
//! - `warmup` — kick off server-side cache warmup
//! - `train` / `label` / `model-info` — ML endpoints

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use chartdeck_client::{AnalysisClient, ApiClient, DataSource, TradeOutcome, TrainOutcome};
use chartdeck_core::compose::{compose, ComposeInput};
use chartdeck_core::series::{PriceSeries, SeriesMeta};
use chartdeck_core::session::SessionStore;
use chartdeck_engine::{
    spawn_fetcher, ChartEngine, EngineConfig, RefreshScheduler, SettingsStore, StatusLineRenderer,
};

#[derive(Parser)]
#[command(name = "chartdeck", about = "Chartdeck CLI — headless charting dashboard engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Subcommand)]
enum Commands {
    /// Run the engine loop: periodic refresh plus live fetch handling.
    Watch {
        /// Path to a TOML config file; flags below override its fields.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        symbol: Option<String>,

        #[arg(long)]
        exchange: Option<String>,

        #[arg(long)]
        range: Option<String>,

        /// Refresh cadence in seconds.
        #[arg(long)]
        interval_secs: Option<u64>,

        #[arg(long)]
        base_url: Option<String>,
    },
    /// Fetch once, compose once, print the render model as JSON.
    Snapshot {
        #[arg(long, default_value = "ATW")]
        symbol: String,

        #[arg(long, default_value = "CSEMA")]
        exchange: String,

        #[arg(long, default_value = "1d")]
        range: String,

        /// Apply a named indicator preset (Default, MA+RSI, Full).
        #[arg(long)]
        preset: Option<String>,

        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Scan cached symbols and print the scoreboard.
    Scan {
        #[arg(long, default_value = "1d")]
        range: String,

        /// Include the trained model's predictions.
        #[arg(long, default_value_t = false)]
        ml: bool,

        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Ask the server to pre-load its symbol cache.
    Warmup {
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Train the ML model on accumulated labels.
    Train {
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Record a trade outcome label.
    Label {
        symbol: String,

        #[arg(long, value_enum)]
        outcome: OutcomeArg,

        /// Trade date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Show model status and metrics.
    ModelInfo {
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutcomeArg {
    Good,
    Bad,
}

impl From<OutcomeArg> for TradeOutcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Good => TradeOutcome::Good,
            OutcomeArg::Bad => TradeOutcome::Bad,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Watch {
            config,
            symbol,
            exchange,
            range,
            interval_secs,
            base_url,
        } => {
            let mut cfg = match config {
                Some(path) => EngineConfig::from_toml_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => EngineConfig::default(),
            };
            if let Some(v) = symbol {
                cfg.symbol = v;
            }
            if let Some(v) = exchange {
                cfg.exchange = v;
            }
            if let Some(v) = range {
                cfg.range = v;
            }
            if let Some(v) = interval_secs {
                cfg.refresh_interval_secs = v;
            }
            if let Some(v) = base_url {
                cfg.base_url = v;
            }
            watch(cfg)
        }
        Commands::Snapshot {
            symbol,
            exchange,
            range,
            preset,
            base_url,
        } => snapshot(&base_url, &symbol, &exchange, &range, preset.as_deref()),
        Commands::Scan {
            range,
            ml,
            base_url,
        } => scan(&base_url, &range, ml),
        Commands::Warmup { base_url } => {
            ApiClient::new(base_url).scan_warmup()?;
            println!("warmup started");
            Ok(())
        }
        Commands::Train { base_url } => train(&base_url),
        Commands::Label {
            symbol,
            outcome,
            date,
            base_url,
        } => label(&base_url, &symbol, outcome, date.as_deref()),
        Commands::ModelInfo { base_url } => model_info(&base_url),
    }
}

fn watch(cfg: EngineConfig) -> Result<()> {
    let client = Arc::new(ApiClient::new(cfg.base_url.clone()));
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let _worker = spawn_fetcher(client.clone(), client, cmd_rx, resp_tx);

    let settings = SettingsStore::new(SettingsStore::default_path());
    let toggles = settings.load();

    let mut engine = ChartEngine::new(cmd_tx, cfg.range.clone(), toggles);
    let mut renderer = StatusLineRenderer;
    engine.create_session(&cfg.symbol, &cfg.exchange)?;

    let mut scheduler = RefreshScheduler::new(cfg.refresh_interval(), Instant::now());
    loop {
        let wait = scheduler
            .time_until_fire(Instant::now())
            .min(Duration::from_millis(250));
        match resp_rx.recv_timeout(wait) {
            Ok(response) => {
                engine.handle_response(response, &mut renderer);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => bail!("fetch worker terminated"),
        }
        if scheduler.fire_due(Instant::now()) {
            engine.refresh();
        }
    }
}

fn snapshot(
    base_url: &str,
    symbol: &str,
    exchange: &str,
    range: &str,
    preset: Option<&str>,
) -> Result<()> {
    let client = ApiClient::new(base_url);
    let mut store = SessionStore::new();
    store.create_session(symbol, exchange)?;
    if let Some(name) = preset {
        if !store.apply_preset(name)? {
            bail!("unknown preset: {name}");
        }
    }

    let series = match client.fetch_series(symbol, exchange, range) {
        Ok(series) => series,
        Err(err) => PriceSeries::empty(SeriesMeta::error(err.to_string())),
    };

    let toggles = SettingsStore::new(SettingsStore::default_path()).load();
    let overlay = match client.fetch_overlay(symbol, exchange, range, &toggles) {
        Ok(overlay) => overlay,
        Err(err) => {
            tracing::warn!(error = %err, "analysis fetch failed");
            None
        }
    };

    let session = store.active().context("no active session")?;
    let model = compose(&ComposeInput {
        session,
        range,
        series: &series,
        analysis: overlay.as_ref(),
    });
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

fn scan(base_url: &str, range: &str, ml: bool) -> Result<()> {
    let client = ApiClient::new(base_url);
    let toggles = SettingsStore::new(SettingsStore::default_path()).load();

    if ml {
        let rows = client.scan_with_ml(range)?;
        println!(
            "{:<8} {:>6} {:>4} {:>6} {:>9}  {:<5} {:>6}  patterns",
            "symbol", "score", "ml", "conf", "combined", "trend", "rsi"
        );
        for row in rows {
            println!(
                "{:<8} {:>6} {:>4} {:>6} {:>9}  {:<5} {:>6}  {}",
                row.symbol,
                fmt_opt(row.score, 2),
                row.ml_prediction
                    .map(|p| (if p == 1 { "+" } else { "-" }).to_string())
                    .unwrap_or_else(|| "?".into()),
                fmt_pct(row.ml_confidence),
                fmt_opt(row.combined_score, 2),
                row.trend.as_deref().unwrap_or("flat"),
                fmt_opt(row.rsi, 1),
                row.patterns.join(", "),
            );
        }
    } else {
        let rows = client.scan(range, &toggles)?;
        println!(
            "{:<8} {:>6}  {:<5} {:>6} {:>5}  patterns",
            "symbol", "score", "trend", "rsi", "macd"
        );
        for row in rows {
            println!(
                "{:<8} {:>6}  {:<5} {:>6} {:>5}  {}",
                row.symbol,
                fmt_opt(row.score, 2),
                row.trend.as_deref().unwrap_or("flat"),
                fmt_opt(row.rsi, 1),
                if row.macd_cross.unwrap_or(false) { "x" } else { "-" },
                row.patterns.join(", "),
            );
        }
    }
    Ok(())
}

fn train(base_url: &str) -> Result<()> {
    match ApiClient::new(base_url).train_model()? {
        TrainOutcome::Success { metrics } => {
            println!(
                "trained: accuracy {:.1}% precision {:.1}% recall {:.1}% f1 {:.1}%",
                metrics.accuracy * 100.0,
                metrics.precision * 100.0,
                metrics.recall * 100.0,
                metrics.f1 * 100.0,
            );
            println!(
                "samples: {} train / {} test",
                metrics.train_size, metrics.test_size
            );
        }
        TrainOutcome::InsufficientData {
            min_required,
            samples,
        } => {
            println!("not enough labels: need {min_required}, have {samples}");
        }
        TrainOutcome::Failed { message } => {
            bail!(
                "training failed{}",
                message.map(|m| format!(": {m}")).unwrap_or_default()
            );
        }
    }
    Ok(())
}

fn label(base_url: &str, symbol: &str, outcome: OutcomeArg, date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date: {raw}"))?,
        None => chrono::Local::now().date_naive(),
    };
    let symbol = symbol.to_uppercase();
    let total = ApiClient::new(base_url).label_trade(&symbol, date, outcome.into())?;
    println!("labeled {symbol} on {date} ({total} labels total)");
    Ok(())
}

fn model_info(base_url: &str) -> Result<()> {
    let info = ApiClient::new(base_url).model_info()?;
    println!("status: {}", info.status);
    if let Some(metrics) = info.metrics {
        println!(
            "accuracy {:.1}% precision {:.1}% recall {:.1}% f1 {:.1}%",
            metrics.accuracy * 100.0,
            metrics.precision * 100.0,
            metrics.recall * 100.0,
            metrics.f1 * 100.0,
        );
    }
    if let Some(count) = info.label_count {
        println!("labels: {count}");
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".into())
}

fn fmt_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.0}%", v * 100.0))
        .unwrap_or_else(|| "-".into())
}
