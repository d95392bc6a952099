//! Datadog metrics query API client.
//!
//! Implements [`TimeSeriesSource`] on top of two endpoints:
//! - `GET /api/v1/validate` — checks the API key.
//! - `GET /api/v1/query?from=&to=&query=` — runs a metrics query.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use scalewatch_monitor::{BoxError, RawSample, RawSeries, TimeSeriesSource};

use crate::error::{UpstreamError, UpstreamResult};

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";

pub struct DatadogClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    app_key: String,
}

impl DatadogClient {
    pub fn new(
        api_url: &str,
        api_key: impl Into<String>,
        app_key: impl Into<String>,
        timeout: Duration,
    ) -> UpstreamResult<Self> {
        let api_url = normalize_url(api_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| UpstreamError::Http {
                url: api_url.clone(),
                source,
            })?;
        Ok(Self {
            http,
            api_url,
            api_key: api_key.into(),
            app_key: app_key.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn validate(&self) -> UpstreamResult<bool> {
        let url = format!("{}/api/v1/validate", self.api_url);
        let resp = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|source| UpstreamError::Http {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::UNAUTHORIZED {
            debug!(status = status.as_u16(), "datadog rejected api key");
            return Ok(false);
        }
        let body = read_body(resp, &url).await?;
        decode_validate(&url, &body)
    }

    async fn query(&self, from: u64, to: u64, expression: &str) -> UpstreamResult<Vec<RawSeries>> {
        let url = format!("{}/api/v1/query", self.api_url);
        debug!(from, to, query = %expression, "datadog query");
        let resp = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(APP_KEY_HEADER, &self.app_key)
            .query(&[
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("query", expression.to_string()),
            ])
            .send()
            .await
            .map_err(|source| UpstreamError::Http {
                url: url.clone(),
                source,
            })?;
        let body = read_body(resp, &url).await?;
        decode_query(&url, &body)
    }
}

#[async_trait]
impl TimeSeriesSource for DatadogClient {
    async fn validate_credentials(&self) -> Result<bool, BoxError> {
        Ok(self.validate().await?)
    }

    async fn query_metrics(
        &self,
        now: u64,
        window: Duration,
        expression: &str,
    ) -> Result<Vec<RawSeries>, BoxError> {
        let from = now.saturating_sub(window.as_secs());
        Ok(self.query(from, now, expression).await?)
    }
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    series: Vec<SeriesPayload>,
}

#[derive(Debug, Deserialize)]
struct SeriesPayload {
    #[serde(default)]
    pointlist: Vec<(f64, Option<f64>)>,
}

async fn read_body(resp: reqwest::Response, url: &str) -> UpstreamResult<String> {
    let status = resp.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    resp.text().await.map_err(|source| UpstreamError::Http {
        url: url.to_string(),
        source,
    })
}

fn decode_validate(url: &str, body: &str) -> UpstreamResult<bool> {
    let parsed: ValidateResponse = serde_json::from_str(body).map_err(|e| UpstreamError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(parsed.valid)
}

/// Decode a query response, dropping points whose value is null.
fn decode_query(url: &str, body: &str) -> UpstreamResult<Vec<RawSeries>> {
    let parsed: QueryResponse = serde_json::from_str(body).map_err(|e| UpstreamError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if parsed.status.as_deref() == Some("error") {
        return Err(UpstreamError::Decode {
            url: url.to_string(),
            message: parsed.error.unwrap_or_else(|| "query failed".to_string()),
        });
    }

    Ok(parsed
        .series
        .into_iter()
        .map(|s| {
            RawSeries::new(
                s.pointlist
                    .into_iter()
                    .filter_map(|(timestamp, value)| value.map(|value| RawSample { timestamp, value }))
                    .collect(),
            )
        })
        .collect())
}

/// Check the scheme and strip any trailing slash.
pub(crate) fn normalize_url(url: &str) -> UpstreamResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(UpstreamError::InvalidEndpoint(url.to_string()));
    }
    Ok(trimmed.to_string())
}
