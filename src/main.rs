use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use turnstile::config::{LoggingConfig, TurnstileConfig};
use turnstile::ratelimit::{IntervalUnit, Limiter};
use turnstile::simulate::{run_load, LoadPlan};

/// Drive a fixed-window limiter with concurrent bursts and report how many
/// requests were admitted.
#[derive(Debug, Parser)]
#[command(name = "turnstile", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum admissions per window
    #[arg(long, allow_hyphen_values = true)]
    capacity: Option<i64>,

    /// Window length, in --unit
    #[arg(long, allow_hyphen_values = true)]
    interval: Option<i64>,

    /// Unit of --interval
    #[arg(long, value_enum)]
    unit: Option<IntervalUnit>,

    /// Number of concurrent callers
    #[arg(long)]
    workers: Option<usize>,

    /// Admission checks per caller per round
    #[arg(long)]
    burst: Option<usize>,

    /// Pause between rounds in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Total run time in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Emit JSON logs
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(&self, config: &mut TurnstileConfig) {
        if let Some(capacity) = self.capacity {
            config.limiter.capacity = capacity;
        }
        if let Some(interval) = self.interval {
            config.limiter.interval = interval;
        }
        if let Some(unit) = self.unit {
            config.limiter.unit = unit;
        }
        if let Some(workers) = self.workers {
            config.load.workers = workers;
        }
        if let Some(burst) = self.burst {
            config.load.burst = burst;
        }
        if let Some(pause_ms) = self.pause_ms {
            config.load.pause_ms = pause_ms;
        }
        if let Some(duration_ms) = self.duration_ms {
            config.load.duration_ms = duration_ms;
        }
        if self.json {
            config.logging.json = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TurnstileConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply(&mut config);

    init_tracing(&config.logging);

    info!("Starting Turnstile");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        capacity = config.limiter.capacity,
        interval = config.limiter.interval,
        unit = %config.limiter.unit,
        "Configuration loaded"
    );

    let limiter = Arc::new(
        Limiter::from_settings(&config.limiter).context("Failed to build limiter")?,
    );
    let plan = LoadPlan::from(&config.load);

    info!(
        workers = plan.workers,
        burst = plan.burst,
        pause_ms = config.load.pause_ms,
        duration_ms = config.load.duration_ms,
        "Running load"
    );

    tokio::select! {
        report = run_load(limiter, plan) => {
            info!(
                admitted = report.admitted,
                rejected = report.rejected,
                "Turnstile finished"
            );
        }
        _ = shutdown_signal() => {
            warn!("Load run interrupted");
        }
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_ids(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .init();
    }
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping");
        }
    }
}
