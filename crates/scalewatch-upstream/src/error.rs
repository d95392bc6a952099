//! Error types for the upstream HTTP transports.

use thiserror::Error;

pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid endpoint {0:?}")]
    InvalidEndpoint(String),

    #[error("master at {0} does not know the current leader")]
    NoLeader(String),
}
