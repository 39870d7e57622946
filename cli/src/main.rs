//! Logpulse CLI
//!
//! Command-line interface for the simulated live log stream.
//!
//! # Usage
//!
//! ```bash
//! logpulse --help
//! logpulse tail --level error --count 5
//! logpulse export --ticks 50 --seed 7 --service auth-api --output logs.txt
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use shared::chrono::Utc;
use shared::config::SimulatorConfig;
use shared::export;
use shared::models::{LogEntry, LogFilter};
use shared::simulator::{LogStreamSimulator, ManualScheduler, Scheduler, TokioScheduler};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Logpulse CLI - simulated live log stream
#[derive(Parser)]
#[command(name = "logpulse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for reproducible output
    #[arg(long, global = true, env = "LOGPULSE_SEED")]
    seed: Option<u64>,

    /// Comma-separated service names to attribute logs to
    #[arg(long, global = true, env = "LOGPULSE_SERVICES")]
    services: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream generated logs to stdout
    Tail(TailArgs),
    /// Generate a batch of logs and write the filtered view
    Export(ExportArgs),
}

/// Filter flags shared by every command.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Level to keep (error, warn, info, debug, or all)
    #[arg(short, long)]
    level: Option<String>,

    /// Service to keep (or all)
    #[arg(short, long)]
    service: Option<String>,

    /// Case-insensitive text matched against message or service
    #[arg(short, long)]
    query: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> LogFilter {
        LogFilter::from_raw(
            self.level.as_deref(),
            self.service.as_deref(),
            self.query.as_deref(),
        )
    }
}

#[derive(Args)]
struct TailArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Milliseconds between generated entries
    #[arg(long, env = "LOGPULSE_TICK_INTERVAL_MS", default_value_t = 3000)]
    interval_ms: u64,

    /// Stop after printing this many entries
    #[arg(short = 'n', long)]
    count: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    /// One `[time] [LEVEL] [service] message trace` line per entry
    #[default]
    Text,
    /// JSON array of entries
    Json,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Number of entries to generate before exporting
    #[arg(short, long, default_value_t = 100)]
    ticks: usize,

    /// Maximum entries kept in the buffer
    #[arg(long, env = "LOGPULSE_BUFFER_CAPACITY", default_value_t = 100)]
    capacity: usize,

    /// Include the fixed sample entries
    #[arg(long)]
    samples: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
    format: ExportFormat,

    /// Write to this file (or a timestamped file in this directory) instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn simulator_config(&self) -> SimulatorConfig {
        let mut config = SimulatorConfig {
            seed: self.seed,
            preload_samples: false,
            autostart: false,
            ..SimulatorConfig::default()
        };
        if let Some(raw) = &self.services {
            config.services = SimulatorConfig::parse_services(raw);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.simulator_config();

    match cli.command {
        Some(Commands::Tail(args)) => {
            let config = SimulatorConfig {
                tick_interval_ms: args.interval_ms,
                ..config
            };
            tail(&config, &args).await?;
        }
        Some(Commands::Export(args)) => {
            let config = SimulatorConfig {
                capacity: args.capacity,
                preload_samples: args.samples,
                ..config
            };
            let body = export_view(&config, &args)?;
            write_output(args.output.as_ref(), &body)?;
        }
        None => {
            println!("Logpulse CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn build_simulator(
    config: &SimulatorConfig,
    scheduler: Arc<dyn Scheduler>,
) -> Result<LogStreamSimulator> {
    config.validate().context("Invalid simulator settings")?;
    Ok(LogStreamSimulator::from_config(config, scheduler)?)
}

/// Streams matching entries to stdout until `--count` is reached or Ctrl+C.
async fn tail(config: &SimulatorConfig, args: &TailArgs) -> Result<()> {
    let simulator = build_simulator(config, Arc::new(TokioScheduler::current()))?;
    let filter = args.filter.to_filter();
    let mut events = simulator.subscribe();
    let mut printed = 0usize;

    simulator.start();
    tracing::info!(interval_ms = config.tick_interval_ms, "Tailing log stream");

    while !args.count.is_some_and(|limit| printed >= limit) {
        tokio::select! {
            received = events.recv() => match received {
                Ok(entry) => {
                    if print_if_matching(&filter, &entry)? {
                        printed += 1;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Output fell behind the stream");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    simulator.stop();
    Ok(())
}

fn print_if_matching(filter: &LogFilter, entry: &LogEntry) -> Result<bool> {
    if !filter.matches(entry) {
        return Ok(false);
    }
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", export::format_line(entry))?;
    stdout.flush()?;
    Ok(true)
}

/// Runs `--ticks` generations and renders the filtered buffer.
fn export_view(config: &SimulatorConfig, args: &ExportArgs) -> Result<String> {
    let simulator = build_simulator(config, Arc::new(ManualScheduler::new()))?;
    for _ in 0..args.ticks {
        simulator.tick()?;
    }

    let filter = args.filter.to_filter();
    match args.format {
        ExportFormat::Text => Ok(simulator.export(&filter)?),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&simulator.query(&filter)?)?),
    }
}

/// Writes `body` to `output`, or stdout when absent.
///
/// A directory target receives a timestamped `logs-*.txt` file.
fn write_output(output: Option<&PathBuf>, body: &str) -> Result<()> {
    let Some(target) = output else {
        println!("{body}");
        return Ok(());
    };

    let path = if target.is_dir() {
        target.join(export::suggested_filename(Utc::now()))
    } else {
        target.clone()
    };
    std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote export");
    Ok(())
}
