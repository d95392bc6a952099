//! Build the configured monitor engine with its HTTP transport.

use scalewatch_monitor::config::MonitorConfig;
use scalewatch_monitor::{
    ClusterMonitor, Monitor, MonitorError, MonitorResult, SyntheticMonitor, TimeSeriesMonitor,
};
use tracing::info;

use crate::datadog::DatadogClient;
use crate::mesos::MesosClient;

pub fn build_monitor(config: &MonitorConfig) -> MonitorResult<Box<dyn Monitor>> {
    match config {
        MonitorConfig::TimeSeries(ts) => {
            let client = DatadogClient::new(ts.api_url(), &ts.api_key, &ts.app_key, ts.timeout()?)
                .map_err(|e| MonitorError::InvalidConfig(e.to_string()))?;
            let lookback = ts.lookback()?;
            info!(
                api_url = client.api_url(),
                metrics = ts.metrics.len(),
                lookback_secs = lookback.as_secs(),
                "time-series monitor configured"
            );
            Ok(Box::new(
                TimeSeriesMonitor::new(Box::new(client), ts.queries()).with_lookback(lookback),
            ))
        }
        MonitorConfig::Cluster(c) => {
            let client = MesosClient::new(c.endpoint(), c.timeout()?)
                .map_err(|e| MonitorError::InvalidConfig(e.to_string()))?;
            info!(endpoint = client.endpoint(), "cluster monitor configured");
            Ok(Box::new(ClusterMonitor::new(Box::new(client))))
        }
        MonitorConfig::Synthetic(s) => {
            info!(increments = s.increments(), "synthetic monitor configured");
            Ok(Box::new(SyntheticMonitor::new(s.increments())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scalewatch_monitor::{MonitorErrorKind, ScalewatchConfig};

    #[tokio::test]
    async fn builds_synthetic_monitor() {
        let config = ScalewatchConfig::from_toml_str("[monitor]\nkind = \"synthetic\"\n").unwrap();
        let monitor = build_monitor(&config.monitor).unwrap();
        let updates = monitor
            .get_updated_metrics(&["load".to_string()])
            .await
            .unwrap();
        assert_eq!(updates[0].current_reading, 50.0);
    }

    #[test]
    fn builds_cluster_monitor_with_default_endpoint() {
        let config = ScalewatchConfig::from_toml_str("[monitor]\nkind = \"mesos\"\n").unwrap();
        assert!(build_monitor(&config.monitor).is_ok());
    }

    #[test]
    fn bad_api_url_is_config_error() {
        let toml_str = r#"
[monitor]
kind = "datadog"
api_key = "foo"
app_key = "bar"
api_url = "ftp://example.com"
"#;
        let config = ScalewatchConfig::from_toml_str(toml_str).unwrap();
        let err = match build_monitor(&config.monitor) {
            Ok(_) => panic!("expected invalid endpoint"),
            Err(e) => e,
        };
        assert_eq!(err.kind(), MonitorErrorKind::InvalidConfig);
    }
}
