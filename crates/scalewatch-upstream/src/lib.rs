//! scalewatch-upstream — HTTP transports behind the monitor engines.
//!
//! ```text
//! DatadogClient  → TimeSeriesSource   (/api/v1/validate, /api/v1/query)
//! MesosClient    → ClusterStateSource (/master/state on any master, then the leader)
//! build_monitor(&MonitorConfig) → Box<dyn Monitor>
//! ```

pub mod datadog;
pub mod error;
pub mod factory;
pub mod mesos;

#[cfg(test)]
mod test_server;

pub use datadog::DatadogClient;
pub use error::{UpstreamError, UpstreamResult};
pub use factory::build_monitor;
pub use mesos::MesosClient;
