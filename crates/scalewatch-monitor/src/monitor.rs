//! The contract every metric engine implements.

use async_trait::async_trait;

use crate::error::MonitorResult;
use crate::types::MetricUpdate;

/// A source of current metric readings.
///
/// Implementations return exactly one [`MetricUpdate`] per requested
/// name, in request order, with `name` copied verbatim. If any name
/// cannot be resolved, or the upstream source fails, the whole call
/// fails and no readings are returned.
#[async_trait]
pub trait Monitor: Send + Sync {
    async fn get_updated_metrics(&self, names: &[String]) -> MonitorResult<Vec<MetricUpdate>>;
}

