//! scalewatch-monitor — pluggable metric sources for autoscaling.
//!
//! A control loop asks a [`Monitor`] for the current value of a set of
//! named metrics and never cares where the values come from. Three
//! engines implement the contract:
//!
//! ```text
//! Monitor::get_updated_metrics(names)
//!   ├── TimeSeriesMonitor  → validate credentials, one query per name,
//!   │                        latest sample of the first series
//!   ├── ClusterMonitor     → resolve leader, fetch node snapshot,
//!   │                        aggregate totals / percentages / min / max
//!   └── SyntheticMonitor   → shifted sine wave, same reading for every name
//! ```
//!
//! Every call fetches fresh upstream data and either resolves every
//! requested name or fails as a whole. Polling cadence, retries and
//! error logging belong to the caller.

pub mod cluster;
pub mod config;
pub mod error;
pub mod monitor;
pub mod source;
pub mod synthetic;
pub mod timeseries;
pub mod types;

pub use cluster::ClusterMonitor;
pub use config::{MonitorConfig, ScalewatchConfig, parse_duration};
pub use error::{BoxError, MonitorError, MonitorErrorKind, MonitorResult, NoDataReason};
pub use monitor::Monitor;
pub use source::{ClusterStateSource, TimeSeriesSource};
pub use synthetic::SyntheticMonitor;
pub use timeseries::TimeSeriesMonitor;
pub use types::*;
