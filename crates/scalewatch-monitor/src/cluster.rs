//! Cluster monitor — derived metrics from a scheduler's node inventory.
//!
//! Every call resolves the current leader, fetches its node snapshot and
//! aggregates it in a single pass:
//!
//! ```text
//! cluster.{cpu,mem}_total    Σ available
//! cluster.{cpu,mem}_used     Σ used
//! cluster.{cpu,mem}_free     total − used
//! cluster.{cpu,mem}_percent  used / total × 100
//!
//! slave.{cpu,mem}_free.{min,max}     per-node available − used
//! slave.{cpu,mem}_used.{min,max}     per-node used
//! slave.{cpu,mem}_percent.{min,max}  per-node used / available × 100
//! ```
//!
//! A `.min`/`.max` pair only exists once some node has contributed to
//! that family. Nodes with zero available capacity for a resource are
//! left out of its `percent` family.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{MonitorError, MonitorResult};
use crate::monitor::Monitor;
use crate::source::ClusterStateSource;
use crate::types::{AggregateStats, ClusterSnapshot, MetricUpdate};

pub const CLUSTER_CPU_TOTAL: &str = "cluster.cpu_total";
pub const CLUSTER_CPU_USED: &str = "cluster.cpu_used";
pub const CLUSTER_CPU_FREE: &str = "cluster.cpu_free";
pub const CLUSTER_CPU_PERCENT: &str = "cluster.cpu_percent";
pub const CLUSTER_MEM_TOTAL: &str = "cluster.mem_total";
pub const CLUSTER_MEM_USED: &str = "cluster.mem_used";
pub const CLUSTER_MEM_FREE: &str = "cluster.mem_free";
pub const CLUSTER_MEM_PERCENT: &str = "cluster.mem_percent";

pub const SLAVE_CPU_FREE: &str = "slave.cpu_free";
pub const SLAVE_CPU_USED: &str = "slave.cpu_used";
pub const SLAVE_CPU_PERCENT: &str = "slave.cpu_percent";
pub const SLAVE_MEM_FREE: &str = "slave.mem_free";
pub const SLAVE_MEM_USED: &str = "slave.mem_used";
pub const SLAVE_MEM_PERCENT: &str = "slave.mem_percent";

pub struct ClusterMonitor {
    client: Box<dyn ClusterStateSource>,
}

impl ClusterMonitor {
    pub fn new(client: Box<dyn ClusterStateSource>) -> Self {
        Self { client }
    }

    /// Fetch a fresh snapshot from the leader and aggregate it.
    pub async fn stats(&self) -> MonitorResult<AggregateStats> {
        let leader = self
            .client
            .determine_leader()
            .await
            .map_err(|e| MonitorError::upstream("resolving cluster leader", e))?;

        let snapshot = self
            .client
            .get_state_from_leader()
            .await
            .map_err(|e| MonitorError::upstream(format!("fetching state from leader {leader}"), e))?;

        debug!(%leader, nodes = snapshot.nodes.len(), "aggregating cluster snapshot");
        aggregate(&snapshot)
    }
}

#[async_trait]
impl Monitor for ClusterMonitor {
    async fn get_updated_metrics(&self, names: &[String]) -> MonitorResult<Vec<MetricUpdate>> {
        let stats = self.stats().await?;

        names
            .iter()
            .map(|name| match stats.get(name) {
                Some(value) => Ok(MetricUpdate::new(name.clone(), *value)),
                None => Err(MonitorError::UnknownMetric {
                    metric: name.clone(),
                }),
            })
            .collect()
    }
}

/// One aggregation pass over a snapshot.
///
/// Pure in the snapshot: the same input always yields the same map.
pub fn aggregate(snapshot: &ClusterSnapshot) -> MonitorResult<AggregateStats> {
    let mut stats = AggregateStats::new();
    let mut cpu_total = 0.0;
    let mut cpu_used = 0.0;
    let mut mem_total = 0.0;
    let mut mem_used = 0.0;

    for node in &snapshot.nodes {
        cpu_total += node.available_cpu;
        cpu_used += node.used_cpu;
        mem_total += node.available_mem;
        mem_used += node.used_mem;

        record_extremes(&mut stats, SLAVE_CPU_FREE, node.available_cpu - node.used_cpu);
        record_extremes(&mut stats, SLAVE_CPU_USED, node.used_cpu);
        if let Some(pct) = percent(node.used_cpu, node.available_cpu) {
            record_extremes(&mut stats, SLAVE_CPU_PERCENT, pct);
        }

        record_extremes(&mut stats, SLAVE_MEM_FREE, node.available_mem - node.used_mem);
        record_extremes(&mut stats, SLAVE_MEM_USED, node.used_mem);
        if let Some(pct) = percent(node.used_mem, node.available_mem) {
            record_extremes(&mut stats, SLAVE_MEM_PERCENT, pct);
        }
    }

    let cpu_percent =
        percent(cpu_used, cpu_total).ok_or(MonitorError::ZeroCapacity { resource: "cpu" })?;
    let mem_percent =
        percent(mem_used, mem_total).ok_or(MonitorError::ZeroCapacity { resource: "mem" })?;

    stats.insert(CLUSTER_CPU_TOTAL.to_string(), cpu_total);
    stats.insert(CLUSTER_CPU_USED.to_string(), cpu_used);
    stats.insert(CLUSTER_CPU_FREE.to_string(), cpu_total - cpu_used);
    stats.insert(CLUSTER_CPU_PERCENT.to_string(), cpu_percent);
    stats.insert(CLUSTER_MEM_TOTAL.to_string(), mem_total);
    stats.insert(CLUSTER_MEM_USED.to_string(), mem_used);
    stats.insert(CLUSTER_MEM_FREE.to_string(), mem_total - mem_used);
    stats.insert(CLUSTER_MEM_PERCENT.to_string(), mem_percent);

    Ok(stats)
}

/// `used / available × 100`, or `None` when there is no capacity to divide by.
fn percent(used: f64, available: f64) -> Option<f64> {
    if available > 0.0 {
        Some(used / available * 100.0)
    } else {
        None
    }
}

/// Fold `value` into the running `{family}.min` / `{family}.max` entries.
fn record_extremes(stats: &mut AggregateStats, family: &str, value: f64) {
    stats
        .entry(format!("{family}.min"))
        .and_modify(|min| {
            if value < *min {
                *min = value;
            }
        })
        .or_insert(value);
    stats
        .entry(format!("{family}.max"))
        .and_modify(|max| {
            if value > *max {
                *max = value;
            }
        })
        .or_insert(value);
}
