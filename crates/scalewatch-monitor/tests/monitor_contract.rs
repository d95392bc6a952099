//! Contract tests shared by every monitor engine.
//!
//! Each engine is driven through `Box<dyn Monitor>` the way a control
//! loop holds it: readings come back one per name, in request order,
//! and a single unresolvable name fails the whole call.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use scalewatch_monitor::*;

struct FixedSeries;

#[async_trait]
impl TimeSeriesSource for FixedSeries {
    async fn validate_credentials(&self) -> Result<bool, BoxError> {
        Ok(true)
    }

    async fn query_metrics(
        &self,
        _now: u64,
        _window: Duration,
        expression: &str,
    ) -> Result<Vec<RawSeries>, BoxError> {
        // Echo the expression length so each metric has a distinct value.
        Ok(vec![RawSeries::new(vec![
            RawSample {
                timestamp: 1.0,
                value: -1.0,
            },
            RawSample {
                timestamp: 2.0,
                value: expression.len() as f64,
            },
        ])])
    }
}

struct FixedCluster;

#[async_trait]
impl ClusterStateSource for FixedCluster {
    async fn determine_leader(&self) -> Result<String, BoxError> {
        Ok("http://leader:5050".to_string())
    }

    async fn get_state_from_leader(&self) -> Result<ClusterSnapshot, BoxError> {
        Ok(ClusterSnapshot {
            nodes: vec![
                NodeResources {
                    available_cpu: 4.0,
                    used_cpu: 1.0,
                    available_mem: 1024.0,
                    used_mem: 512.0,
                },
                NodeResources {
                    available_cpu: 4.0,
                    used_cpu: 3.0,
                    available_mem: 1024.0,
                    used_mem: 256.0,
                },
            ],
        })
    }
}

fn time_series_monitor() -> Box<dyn Monitor> {
    let queries = HashMap::from([
        ("short".to_string(), "a".to_string()),
        ("medium".to_string(), "abc".to_string()),
        ("long".to_string(), "abcdef".to_string()),
    ]);
    Box::new(TimeSeriesMonitor::new(Box::new(FixedSeries), queries))
}

fn cluster_monitor() -> Box<dyn Monitor> {
    Box::new(ClusterMonitor::new(Box::new(FixedCluster)))
}

fn synthetic_monitor() -> Box<dyn Monitor> {
    Box::new(SyntheticMonitor::default())
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

async fn assert_order_preserved(monitor: &dyn Monitor, requested: Vec<String>) {
    let updates = monitor.get_updated_metrics(&requested).await.unwrap();
    let returned: Vec<&str> = updates.iter().map(|u| u.name.as_str()).collect();
    let expected: Vec<&str> = requested.iter().map(String::as_str).collect();
    assert_eq!(returned, expected);
}

#[tokio::test]
async fn time_series_preserves_request_order() {
    let monitor = time_series_monitor();
    assert_order_preserved(monitor.as_ref(), names(&["long", "short", "medium"])).await;

    let updates = monitor
        .get_updated_metrics(&names(&["long", "short"]))
        .await
        .unwrap();
    assert_eq!(updates[0].current_reading, 6.0);
    assert_eq!(updates[1].current_reading, 1.0);
}

#[tokio::test]
async fn cluster_preserves_request_order() {
    let monitor = cluster_monitor();
    assert_order_preserved(
        monitor.as_ref(),
        names(&[
            "slave.cpu_percent.max",
            "cluster.mem_percent",
            "cluster.cpu_percent",
            "slave.mem_used.min",
        ]),
    )
    .await;

    let updates = monitor
        .get_updated_metrics(&names(&["cluster.cpu_percent", "slave.cpu_percent.max"]))
        .await
        .unwrap();
    assert_eq!(updates[0].current_reading, 50.0);
    assert_eq!(updates[1].current_reading, 75.0);
}

#[tokio::test]
async fn synthetic_preserves_request_order() {
    let monitor = synthetic_monitor();
    assert_order_preserved(monitor.as_ref(), names(&["z", "a", "m"])).await;
}

#[tokio::test]
async fn repeated_names_are_answered_per_position() {
    let monitor = cluster_monitor();
    let updates = monitor
        .get_updated_metrics(&names(&["cluster.cpu_used", "cluster.cpu_used"]))
        .await
        .unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0], updates[1]);
}

#[tokio::test]
async fn unresolvable_name_fails_whole_call() {
    let cases: Vec<(Box<dyn Monitor>, MonitorErrorKind)> = vec![
        (time_series_monitor(), MonitorErrorKind::Configuration),
        (cluster_monitor(), MonitorErrorKind::UnknownMetric),
    ];

    for (monitor, kind) in cases {
        let result = monitor
            .get_updated_metrics(&names(&["cluster.cpu_percent", "short", "nope"]))
            .await;
        match result {
            Ok(updates) => panic!("expected failure, got {updates:?}"),
            Err(e) => assert_eq!(e.kind(), kind, "{e}"),
        }
    }
}

#[tokio::test]
async fn empty_request_yields_empty_response() {
    for monitor in [time_series_monitor(), cluster_monitor(), synthetic_monitor()] {
        let updates = monitor.get_updated_metrics(&[]).await.unwrap();
        assert!(updates.is_empty());
    }
}
