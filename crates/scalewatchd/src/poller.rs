//! Poller — the periodic caller of a [`Monitor`].
//!
//! Owns the retry boundary: a failed poll is logged and the next tick
//! tries again. Monitors themselves never retry or log their errors.

use std::error::Error as _;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use scalewatch_monitor::{MetricUpdate, Monitor, MonitorResult};

pub struct Poller {
    monitor: Box<dyn Monitor>,
    metrics: Vec<String>,
    interval: Duration,
}

impl Poller {
    pub fn new(monitor: Box<dyn Monitor>, metrics: Vec<String>, interval: Duration) -> Self {
        Self {
            monitor,
            metrics,
            interval,
        }
    }

    /// Request every configured metric once and log the readings.
    pub async fn poll_once(&self) -> MonitorResult<Vec<MetricUpdate>> {
        let updates = self.monitor.get_updated_metrics(&self.metrics).await?;
        for update in &updates {
            info!(metric = %update.name, reading = update.current_reading, "metric reading");
        }
        Ok(updates)
    }

    /// Poll on every interval until the shutdown signal fires.
    ///
    /// A dropped sender is not a shutdown request. Returns the number of
    /// polls that succeeded.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> u64 {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            metrics = self.metrics.len(),
            "poller started"
        );

        let mut succeeded = 0;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    match self.poll_once().await {
                        Ok(_) => succeeded += 1,
                        Err(e) => error!(
                            error = %e,
                            kind = ?e.kind(),
                            cause = ?e.source().map(|c| c.to_string()),
                            "metric poll failed"
                        ),
                    }
                }
                () = shutdown_requested(&mut shutdown) => {
                    info!("poller shutting down");
                    break;
                }
            }
        }
        succeeded
    }
}

async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.changed().await.is_err() {
        std::future::pending::<()>().await;
    }
}
