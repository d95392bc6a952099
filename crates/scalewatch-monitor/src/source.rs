//! Capabilities the engines need from their upstream transports.
//!
//! Concrete HTTP clients live in `scalewatch-upstream`; tests supply
//! in-memory implementations.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::types::{ClusterSnapshot, RawSeries};

/// A hosted time-series metrics API.
#[async_trait]
pub trait TimeSeriesSource: Send + Sync {
    /// Ask the source whether the configured credentials are accepted.
    async fn validate_credentials(&self) -> Result<bool, BoxError>;

    /// Run `expression` over the `window` ending at `now` (unix seconds).
    async fn query_metrics(
        &self,
        now: u64,
        window: Duration,
        expression: &str,
    ) -> Result<Vec<RawSeries>, BoxError>;
}

/// A distributed scheduler exposing a leader and its node inventory.
#[async_trait]
pub trait ClusterStateSource: Send + Sync {
    /// Resolve the current leader and return its endpoint.
    async fn determine_leader(&self) -> Result<String, BoxError>;

    /// Fetch the node snapshot from the most recently resolved leader.
    async fn get_state_from_leader(&self) -> Result<ClusterSnapshot, BoxError>;
}
