//! Synthetic monitor — a rising and falling reading with no upstream.
//!
//! Useful for exercising a control loop end to end. Every call advances
//! a sine wave by `increments` degrees and reports the same reading for
//! every requested name.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::config::DEFAULT_INCREMENTS;
use crate::error::MonitorResult;
use crate::monitor::Monitor;
use crate::types::MetricUpdate;

pub struct SyntheticMonitor {
    increments: u32,
    iteration: AtomicU64,
}

impl SyntheticMonitor {
    pub fn new(increments: u32) -> Self {
        Self {
            increments,
            iteration: AtomicU64::new(0),
        }
    }

    /// Produce the next reading in `0.0..=100.0`, truncated to a whole number.
    fn next_reading(&self) -> f64 {
        let iteration = self.iteration.fetch_add(1, Ordering::Relaxed);
        reading_at(iteration, self.increments)
    }
}

impl Default for SyntheticMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_INCREMENTS)
    }
}

#[async_trait]
impl Monitor for SyntheticMonitor {
    async fn get_updated_metrics(&self, names: &[String]) -> MonitorResult<Vec<MetricUpdate>> {
        let reading = self.next_reading();
        debug!(reading, metrics = names.len(), "setting all metrics to synthetic reading");
        Ok(names
            .iter()
            .map(|name| MetricUpdate::new(name.clone(), reading))
            .collect())
    }
}

fn reading_at(iteration: u64, increments: u32) -> f64 {
    let degrees = iteration as f64 * f64::from(increments);
    ((degrees.to_radians().sin() + 1.0) * 50.0).trunc()
}
