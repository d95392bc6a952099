//! Mesos master state client.
//!
//! Any master answers `/master/state` with the current leader's PID
//! (`master@host:port`); the node inventory is read from the leader's
//! own `/master/state`. The resolved leader is remembered so that
//! [`ClusterStateSource::get_state_from_leader`] talks to it directly.
//! When the contacted master is itself the leader, the state read during
//! resolution is handed to the next snapshot request instead of being
//! downloaded again.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use scalewatch_monitor::{BoxError, ClusterSnapshot, ClusterStateSource, NodeResources};

use crate::datadog::normalize_url;
use crate::error::{UpstreamError, UpstreamResult};

pub struct MesosClient {
    http: reqwest::Client,
    /// Master contacted to discover the leader.
    endpoint: String,
    /// Leader URL from the last successful resolution.
    leader: RwLock<Option<String>>,
    /// Leader state read during resolution, consumed by the next snapshot.
    resolved_state: Mutex<Option<ClusterSnapshot>>,
}

impl MesosClient {
    pub fn new(endpoint: &str, timeout: Duration) -> UpstreamResult<Self> {
        let endpoint = normalize_url(endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| UpstreamError::Http {
                url: endpoint.clone(),
                source,
            })?;
        Ok(Self {
            http,
            endpoint,
            leader: RwLock::new(None),
            resolved_state: Mutex::new(None),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_state(&self, base: &str) -> UpstreamResult<MasterState> {
        let url = format!("{base}/master/state");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Http {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.map_err(|source| UpstreamError::Http {
            url: url.clone(),
            source,
        })?;
        decode_state(&url, &body)
    }

    async fn resolve_leader(&self) -> UpstreamResult<String> {
        let state = self.fetch_state(&self.endpoint).await?;
        let pid = state
            .leader
            .as_deref()
            .ok_or_else(|| UpstreamError::NoLeader(self.endpoint.clone()))?;
        let leader = leader_url(pid)?;

        debug!(%leader, master = %self.endpoint, "resolved mesos leader");
        *self.resolved_state.lock().await = if leader == self.endpoint {
            Some(state.into_snapshot())
        } else {
            None
        };
        *self.leader.write().await = Some(leader.clone());
        Ok(leader)
    }

    async fn leader_snapshot(&self) -> UpstreamResult<ClusterSnapshot> {
        if let Some(snapshot) = self.resolved_state.lock().await.take() {
            return Ok(snapshot);
        }
        let cached = self.leader.read().await.clone();
        let leader = match cached {
            Some(leader) => leader,
            None => self.resolve_leader().await?,
        };
        let state = self.fetch_state(&leader).await?;
        Ok(state.into_snapshot())
    }
}

#[async_trait]
impl ClusterStateSource for MesosClient {
    async fn determine_leader(&self) -> Result<String, BoxError> {
        Ok(self.resolve_leader().await?)
    }

    async fn get_state_from_leader(&self) -> Result<ClusterSnapshot, BoxError> {
        Ok(self.leader_snapshot().await?)
    }
}

#[derive(Debug, Deserialize)]
struct MasterState {
    #[serde(default)]
    leader: Option<String>,
    #[serde(default)]
    slaves: Vec<SlavePayload>,
}

#[derive(Debug, Deserialize)]
struct SlavePayload {
    #[serde(default)]
    unreserved_resources: ResourcesPayload,
    #[serde(default)]
    used_resources: ResourcesPayload,
}

#[derive(Debug, Default, Deserialize)]
struct ResourcesPayload {
    #[serde(default)]
    cpus: f64,
    #[serde(default)]
    mem: f64,
}

impl MasterState {
    fn into_snapshot(self) -> ClusterSnapshot {
        ClusterSnapshot {
            nodes: self
                .slaves
                .into_iter()
                .map(|s| NodeResources {
                    available_cpu: s.unreserved_resources.cpus,
                    used_cpu: s.used_resources.cpus,
                    available_mem: s.unreserved_resources.mem,
                    used_mem: s.used_resources.mem,
                })
                .collect(),
        }
    }
}

fn decode_state(url: &str, body: &str) -> UpstreamResult<MasterState> {
    serde_json::from_str(body).map_err(|e| UpstreamError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Turn a leader PID like `master@10.0.0.1:5050` into `http://10.0.0.1:5050`.
fn leader_url(pid: &str) -> UpstreamResult<String> {
    let address = pid.rsplit_once('@').map(|(_, addr)| addr).unwrap_or(pid);
    if address.is_empty() || !address.contains(':') {
        return Err(UpstreamError::InvalidEndpoint(pid.to_string()));
    }
    Ok(format!("http://{address}"))
}
