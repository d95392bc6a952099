//! Error types for metric monitors.

use thiserror::Error;

/// Boxed upstream failure carried as the cause of a [`MonitorError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Why a time-series query produced no usable reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataReason {
    /// The query matched no series at all.
    NoSeries,
    /// The first series matched but holds no points in the window.
    NoPoints,
}

impl std::fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoDataReason::NoSeries => f.write_str("query returned no series"),
            NoDataReason::NoPoints => f.write_str("series has no points"),
        }
    }
}

/// Discriminant of a [`MonitorError`], for callers that branch on the
/// failure mode without caring about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorErrorKind {
    Authentication,
    Configuration,
    NoData,
    UnknownMetric,
    UpstreamUnavailable,
    ZeroCapacity,
    InvalidConfig,
}

/// Errors returned by [`crate::Monitor`] implementations.
///
/// Any of these aborts the whole `get_updated_metrics` call.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("credentials rejected by metrics source")]
    Authentication {
        /// `None` when the source answered "invalid"; `Some` when the
        /// validation request itself failed.
        #[source]
        cause: Option<BoxError>,
    },

    #[error("no query configured for metric {metric}")]
    Configuration { metric: String },

    #[error("no data for metric {metric}: {reason}")]
    NoData { metric: String, reason: NoDataReason },

    #[error("unknown metric: {metric}")]
    UnknownMetric { metric: String },

    #[error("{context}")]
    UpstreamUnavailable {
        context: String,
        #[source]
        cause: BoxError,
    },

    #[error("cluster reports zero total {resource} capacity")]
    ZeroCapacity { resource: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MonitorError {
    pub fn kind(&self) -> MonitorErrorKind {
        match self {
            MonitorError::Authentication { .. } => MonitorErrorKind::Authentication,
            MonitorError::Configuration { .. } => MonitorErrorKind::Configuration,
            MonitorError::NoData { .. } => MonitorErrorKind::NoData,
            MonitorError::UnknownMetric { .. } => MonitorErrorKind::UnknownMetric,
            MonitorError::UpstreamUnavailable { .. } => MonitorErrorKind::UpstreamUnavailable,
            MonitorError::ZeroCapacity { .. } => MonitorErrorKind::ZeroCapacity,
            MonitorError::InvalidConfig(_) => MonitorErrorKind::InvalidConfig,
        }
    }

    /// Wrap an upstream failure with a short description of what was attempted.
    pub fn upstream(context: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        MonitorError::UpstreamUnavailable {
            context: context.into(),
            cause: cause.into(),
        }
    }
}
