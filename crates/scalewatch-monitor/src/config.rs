//! scalewatch.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{MonitorError, MonitorResult};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_DATADOG_URL: &str = "https://api.datadoghq.com";
pub const DEFAULT_MESOS_ENDPOINT: &str = "http://localhost:5050";
pub const DEFAULT_INCREMENTS: u32 = 10;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalewatchConfig {
    /// How often the daemon polls the monitor (e.g. "30s").
    pub poll_interval: Option<String>,
    /// Metric names requested on every poll.
    #[serde(default)]
    pub metrics: Vec<String>,
    pub monitor: MonitorConfig,
}

/// Which engine to build, with its engine-specific options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonitorConfig {
    #[serde(alias = "datadog")]
    TimeSeries(TimeSeriesConfig),
    #[serde(alias = "mesos")]
    Cluster(ClusterConfig),
    #[serde(alias = "fake")]
    Synthetic(SyntheticConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesConfig {
    pub api_key: String,
    pub app_key: String,
    pub api_url: Option<String>,
    /// Lookback window for every query (e.g. "5m").
    pub time_period: Option<String>,
    /// Request timeout for the HTTP transport (e.g. "10s").
    pub timeout: Option<String>,
    /// Metric name → query definition.
    #[serde(default)]
    pub metrics: HashMap<String, MetricQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricQuery {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClusterConfig {
    pub endpoint: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SyntheticConfig {
    /// Degrees the sine wave advances per call.
    pub increments: Option<u32>,
}

impl ScalewatchConfig {
    pub fn from_file(path: &Path) -> MonitorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::InvalidConfig(format!("reading {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config document.
    pub fn from_toml_str(content: &str) -> MonitorResult<Self> {
        let config: ScalewatchConfig =
            toml::from_str(content).map_err(|e| MonitorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> MonitorResult<Duration> {
        duration_or(self.poll_interval.as_deref(), "poll_interval", DEFAULT_POLL_INTERVAL)
    }

    fn validate(&self) -> MonitorResult<()> {
        self.poll_interval()?;
        match &self.monitor {
            MonitorConfig::TimeSeries(ts) => {
                if ts.api_key.trim().is_empty() || ts.app_key.trim().is_empty() {
                    return Err(MonitorError::InvalidConfig(
                        "api_key and app_key must be set".to_string(),
                    ));
                }
                ts.lookback()?;
                ts.timeout()?;
            }
            MonitorConfig::Cluster(c) => {
                c.timeout()?;
            }
            MonitorConfig::Synthetic(_) => {}
        }
        Ok(())
    }
}

impl TimeSeriesConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_DATADOG_URL)
    }

    pub fn lookback(&self) -> MonitorResult<Duration> {
        duration_or(self.time_period.as_deref(), "time_period", DEFAULT_LOOKBACK)
    }

    pub fn timeout(&self) -> MonitorResult<Duration> {
        duration_or(self.timeout.as_deref(), "timeout", DEFAULT_REQUEST_TIMEOUT)
    }

    /// Flatten the per-metric table into name → expression.
    pub fn queries(&self) -> HashMap<String, String> {
        self.metrics
            .iter()
            .map(|(name, q)| (name.clone(), q.query.clone()))
            .collect()
    }
}

impl ClusterConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_MESOS_ENDPOINT)
    }

    pub fn timeout(&self) -> MonitorResult<Duration> {
        duration_or(self.timeout.as_deref(), "timeout", DEFAULT_REQUEST_TIMEOUT)
    }
}

impl SyntheticConfig {
    pub fn increments(&self) -> u32 {
        self.increments.unwrap_or(DEFAULT_INCREMENTS)
    }
}

fn duration_or(value: Option<&str>, field: &str, default: Duration) -> MonitorResult<Duration> {
    match value {
        None => Ok(default),
        Some(s) => parse_duration(s)
            .ok_or_else(|| MonitorError::InvalidConfig(format!("{field}: invalid duration {s:?}"))),
    }
}

/// Parse a duration string like "500ms", "30s", "5m", "1h" or bare seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else if let Some(hours) = s.strip_suffix('h') {
        hours
            .parse::<u64>()
            .ok()
            .and_then(|h| h.checked_mul(3600))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
