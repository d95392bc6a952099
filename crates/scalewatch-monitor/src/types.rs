//! Data carried between upstream sources, monitors and their callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Readings ───────────────────────────────────────────────────────

/// Current value of one requested metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricUpdate {
    pub name: String,
    pub current_reading: f64,
}

impl MetricUpdate {
    pub fn new(name: impl Into<String>, current_reading: f64) -> Self {
        Self {
            name: name.into(),
            current_reading,
        }
    }
}

// ── Time series ───────────────────────────────────────────────────

/// One point of a queried time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Unix timestamp as reported by the source (unit is source-defined).
    pub timestamp: f64,
    pub value: f64,
}

/// Points matched by one query target, in the order the source sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub points: Vec<RawSample>,
}

impl RawSeries {
    pub fn new(points: Vec<RawSample>) -> Self {
        Self { points }
    }

    /// The most recent point, trusting the source's ordering.
    pub fn latest(&self) -> Option<&RawSample> {
        self.points.last()
    }
}

// ── Cluster state ─────────────────────────────────────────────────

/// Available and used capacity of a single cluster node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResources {
    pub available_cpu: f64,
    pub used_cpu: f64,
    pub available_mem: f64,
    pub used_mem: f64,
}

/// Point-in-time listing of every node known to the cluster leader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub nodes: Vec<NodeResources>,
}

/// Derived cluster metrics keyed by name (`cluster.cpu_percent`,
/// `slave.mem_free.max`, ...).
pub type AggregateStats = HashMap<String, f64>;
