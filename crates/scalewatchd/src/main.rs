//! scalewatchd — the Scalewatch daemon.
//!
//! Loads `scalewatch.toml`, builds the configured monitor (time-series,
//! cluster or synthetic) and either reports the current readings once
//! or keeps polling until interrupted.
//!
//! # Usage
//!
//! ```text
//! scalewatchd watch --config /etc/scalewatch/scalewatch.toml
//! scalewatchd probe --config scalewatch.toml --metric cluster.cpu_percent
//! ```

mod poller;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info};

use scalewatch_monitor::{ScalewatchConfig, parse_duration};
use scalewatch_upstream::build_monitor;

use crate::poller::Poller;

const DEFAULT_LOG_FILTER: &str = "info,scalewatchd=debug,scalewatch_monitor=debug,scalewatch_upstream=debug";

#[derive(Parser)]
#[command(name = "scalewatchd", about = "Scalewatch metric monitor daemon")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the configured metrics on an interval until Ctrl-C.
    Watch {
        /// Path to the configuration file.
        #[arg(long, default_value = "scalewatch.toml")]
        config: PathBuf,

        /// Override the configured poll interval (e.g. "15s").
        #[arg(long)]
        interval: Option<String>,
    },
    /// Fetch the current readings once and print them as JSON.
    Probe {
        /// Path to the configuration file.
        #[arg(long, default_value = "scalewatch.toml")]
        config: PathBuf,

        /// Metric to request; repeatable. Defaults to the configured list.
        #[arg(long = "metric")]
        metrics: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Watch { config, interval } => run_watch(config, interval).await,
        Command::Probe { config, metrics } => run_probe(config, metrics).await,
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run_watch(config_path: PathBuf, interval: Option<String>) -> anyhow::Result<()> {
    let config = ScalewatchConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let interval = match interval {
        Some(s) => parse_duration(&s).with_context(|| format!("invalid --interval {s:?}"))?,
        None => config.poll_interval()?,
    };
    if config.metrics.is_empty() {
        anyhow::bail!("no metrics configured in {}", config_path.display());
    }

    let monitor = build_monitor(&config.monitor)?;
    let poller = Poller::new(monitor, config.metrics.clone(), interval);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!(error = %e, "cannot listen for interrupt, polling until killed");
                // Hold the sender so the poller keeps running.
                std::future::pending::<()>().await;
            }
        }
    });

    let succeeded = poller.run(shutdown_rx).await;
    info!(polls = succeeded, "scalewatchd stopped");
    Ok(())
}

async fn run_probe(config_path: PathBuf, metrics: Vec<String>) -> anyhow::Result<()> {
    let config = ScalewatchConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let metrics = if metrics.is_empty() {
        config.metrics.clone()
    } else {
        metrics
    };

    let monitor = build_monitor(&config.monitor)?;
    let updates = monitor
        .get_updated_metrics(&metrics)
        .await
        .context("fetching metric readings")?;

    println!("{}", serde_json::to_string_pretty(&updates)?);
    Ok(())
}
