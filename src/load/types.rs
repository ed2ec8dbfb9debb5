//! Load engine types and error definitions.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Errors that end a load operation before or instead of producing a step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Caller input rejected before any request was issued.
    #[error("{0}")]
    InvalidInput(String),

    /// Shutdown was signalled while the step was in flight.
    #[error("load run cancelled")]
    Cancelled,
}

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors a single probe request can end with.
///
/// These never escape the driver; each one becomes a failed
/// [`RequestOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Validated input for one load run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequestSpec {
    url: Url,
    requests: u32,
    timeout: Duration,
}

impl LoadRequestSpec {
    /// Validate raw caller input.
    ///
    /// Rejects blank or unparseable URLs, non-http(s) schemes, request counts
    /// below one and timeouts that are not positive finite numbers.
    pub fn new(url: &str, requests: i64, timeout_secs: f64) -> LoadResult<Self> {
        let url = parse_target_url(url)?;

        if requests < 1 {
            return Err(LoadError::InvalidInput("requests must be >= 1".into()));
        }
        let requests = u32::try_from(requests)
            .map_err(|_| LoadError::InvalidInput(format!("requests must be <= {}", u32::MAX)))?;

        let timeout = parse_timeout(timeout_secs)?;

        Ok(Self { url, requests, timeout })
    }

    pub(crate) fn from_parts(url: Url, requests: u32, timeout: Duration) -> Self {
        Self { url, requests, timeout }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn requests(&self) -> u32 {
        self.requests
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Parse a caller-supplied target into an absolute http(s) URL.
pub fn parse_target_url(raw: &str) -> LoadResult<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LoadError::InvalidInput("url is required".into()));
    }
    let url = Url::parse(raw)
        .map_err(|e| LoadError::InvalidInput(format!("invalid url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(LoadError::InvalidInput(format!(
            "unsupported url scheme '{}'",
            other
        ))),
    }
}

/// Convert a timeout in seconds into a positive [`Duration`].
pub fn parse_timeout(timeout_secs: f64) -> LoadResult<Duration> {
    if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
        return Err(LoadError::InvalidInput("timeout must be > 0".into()));
    }
    Duration::try_from_secs_f64(timeout_secs)
        .map_err(|_| LoadError::InvalidInput("timeout is out of range".into()))
}

/// Classification of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Success,
    Failure,
}

/// The result of one issued request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub elapsed: Duration,
    pub classification: Classification,
    /// Status code for responses, error text for transport failures.
    pub detail: Option<String>,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        self.classification == Classification::Success
    }
}

/// Reduced latency statistics, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    pub count: usize,
    pub min_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
}

/// Aggregate of one load level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub requests: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub success_rate: f64,
    pub avg_latency_ms: Option<f64>,
    pub min_latency_ms: Option<f64>,
    pub max_latency_ms: Option<f64>,
    pub healthy: bool,
}

impl StepResult {
    /// Build an unjudged step from counts and an optional latency reduction.
    pub fn new(success_count: u32, failure_count: u32, latency: Option<LatencySummary>) -> Self {
        let requests = success_count + failure_count;
        let success_rate = if requests > 0 {
            f64::from(success_count) / f64::from(requests)
        } else {
            0.0
        };

        Self {
            requests,
            success_count,
            failure_count,
            success_rate,
            avg_latency_ms: latency.map(|l| l.avg_ms),
            min_latency_ms: latency.map(|l| l.min_ms),
            max_latency_ms: latency.map(|l| l.max_ms),
            healthy: false,
        }
    }
}

/// Response body of a plain load test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadTestReport {
    pub url: String,
    pub total_requests: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub avg_latency_ms: Option<f64>,
    pub min_latency_ms: Option<f64>,
    pub max_latency_ms: Option<f64>,
}

impl LoadTestReport {
    pub fn from_step(url: &str, step: &StepResult) -> Self {
        Self {
            url: url.to_string(),
            total_requests: step.requests,
            success_count: step.success_count,
            failure_count: step.failure_count,
            avg_latency_ms: step.avg_latency_ms,
            min_latency_ms: step.min_latency_ms,
            max_latency_ms: step.max_latency_ms,
        }
    }
}
