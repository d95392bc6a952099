//! Time-series monitor — current values from a hosted metrics API.
//!
//! Each requested metric name maps to a configured query expression.
//! On every call the monitor validates its credentials once, runs one
//! query per name over the lookback window ending now, and takes the
//! last point of the first returned series as the current reading.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tracing::debug;

use crate::config::DEFAULT_LOOKBACK;
use crate::error::{MonitorError, MonitorResult, NoDataReason};
use crate::monitor::Monitor;
use crate::source::TimeSeriesSource;
use crate::types::{MetricUpdate, RawSeries};

pub struct TimeSeriesMonitor {
    source: Box<dyn TimeSeriesSource>,
    /// Metric name → query expression.
    queries: HashMap<String, String>,
    lookback: Duration,
}

impl TimeSeriesMonitor {
    pub fn new(source: Box<dyn TimeSeriesSource>, queries: HashMap<String, String>) -> Self {
        Self {
            source,
            queries,
            lookback: DEFAULT_LOOKBACK,
        }
    }

    /// Set the query lookback window.
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn lookback(&self) -> Duration {
        self.lookback
    }

    async fn ensure_authenticated(&self) -> MonitorResult<()> {
        match self.source.validate_credentials().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MonitorError::Authentication { cause: None }),
            Err(e) => Err(MonitorError::Authentication { cause: Some(e) }),
        }
    }

    async fn current_value(&self, name: &str, now: u64) -> MonitorResult<f64> {
        let expression = self
            .queries
            .get(name)
            .ok_or_else(|| MonitorError::Configuration {
                metric: name.to_string(),
            })?;

        debug!(
            metric = %name,
            query = %expression,
            window_secs = self.lookback.as_secs(),
            "querying metric"
        );

        let series = self
            .source
            .query_metrics(now, self.lookback, expression)
            .await
            .map_err(|e| MonitorError::upstream(format!("querying metric {name}"), e))?;

        latest_reading(name, &series)
    }
}

#[async_trait]
impl Monitor for TimeSeriesMonitor {
    async fn get_updated_metrics(&self, names: &[String]) -> MonitorResult<Vec<MetricUpdate>> {
        self.ensure_authenticated().await?;

        let now = epoch_secs();
        let mut updates = Vec::with_capacity(names.len());
        for name in names {
            let value = self.current_value(name, now).await?;
            updates.push(MetricUpdate::new(name.clone(), value));
        }

        debug!(metrics = updates.len(), "time-series readings updated");
        Ok(updates)
    }
}

/// Reduce a query result to its most recent sample.
///
/// Only the first series is considered; its points are trusted to be
/// in ascending time order.
fn latest_reading(name: &str, series: &[RawSeries]) -> MonitorResult<f64> {
    let first = series.first().ok_or_else(|| MonitorError::NoData {
        metric: name.to_string(),
        reason: NoDataReason::NoSeries,
    })?;
    let point = first.latest().ok_or_else(|| MonitorError::NoData {
        metric: name.to_string(),
        reason: NoDataReason::NoPoints,
    })?;
    Ok(point.value)
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
