//! Capacity search controller.
//!
//! # State Transitions
//! ```text
//! Running → (step healthy)   → Running (next level) | Exhausted (no levels left)
//! Running → (step unhealthy) → StoppedEarly
//! Running → (shutdown)       → Cancelled (interrupted step discarded)
//! ```
//!
//! Steps are strictly sequential: a step's verdict decides whether the next
//! one runs at all.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::capacity::health::Thresholds;
use crate::capacity::levels::normalize_levels;
use crate::lifecycle::ShutdownSignal;
use crate::load::types::{parse_target_url, parse_timeout};
use crate::load::{LoadDriver, LoadRequestSpec, LoadResult, StepResult};
use crate::observability::metrics;

/// Validated input for one capacity search.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityPlan {
    url: Url,
    levels: Vec<u32>,
    timeout: Duration,
}

impl CapacityPlan {
    /// Validate the target and normalize the raw levels.
    pub fn new(url: &str, levels: &[Value], timeout_secs: f64) -> LoadResult<Self> {
        let url = parse_target_url(url)?;
        let levels = normalize_levels(levels)?;
        let timeout = parse_timeout(timeout_secs)?;
        Ok(Self { url, levels, timeout })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Every level was attempted and found healthy.
    Exhausted,
    /// An unhealthy level ended the search.
    StoppedEarly,
    /// Shutdown interrupted the search.
    Cancelled,
}

/// Result of one capacity search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityReport {
    pub url: String,
    /// Normalized levels that were requested.
    pub levels: Vec<u32>,
    /// Levels actually attempted, in order.
    pub steps: Vec<u32>,
    pub results: Vec<StepResult>,
    pub max_healthy_requests: u32,
    pub thresholds: Thresholds,
    pub outcome: SearchOutcome,
}

impl CapacityReport {
    fn new(plan: &CapacityPlan, thresholds: Thresholds) -> Self {
        Self {
            url: plan.url.to_string(),
            levels: plan.levels.clone(),
            steps: Vec::with_capacity(plan.levels.len()),
            results: Vec::with_capacity(plan.levels.len()),
            max_healthy_requests: 0,
            thresholds,
            outcome: SearchOutcome::Exhausted,
        }
    }

    fn record(&mut self, level: u32, step: StepResult) {
        if step.healthy {
            self.max_healthy_requests = level;
        }
        self.steps.push(level);
        self.results.push(step);
    }
}

/// Drives load steps at rising levels until one is unhealthy.
pub struct CapacitySearch {
    driver: Arc<LoadDriver>,
    thresholds: Thresholds,
}

impl CapacitySearch {
    pub fn new(driver: Arc<LoadDriver>, thresholds: Thresholds) -> Self {
        Self { driver, thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub async fn run(&self, plan: &CapacityPlan, shutdown: &mut ShutdownSignal) -> CapacityReport {
        let span = tracing::info_span!(
            "capacity_search",
            run_id = %Uuid::new_v4(),
            url = %plan.url,
        );
        self.search(plan, shutdown).instrument(span).await
    }

    async fn search(&self, plan: &CapacityPlan, shutdown: &mut ShutdownSignal) -> CapacityReport {
        let mut report = CapacityReport::new(plan, self.thresholds);
        tracing::info!(levels = ?plan.levels, "Capacity search starting");

        let mut outcome = SearchOutcome::Exhausted;
        for &level in &plan.levels {
            let spec = LoadRequestSpec::from_parts(plan.url.clone(), level, plan.timeout);

            let mut step = match self.driver.run(&spec, shutdown).await {
                Ok(step) => step,
                Err(e) => {
                    tracing::warn!(level, error = %e, "Capacity search interrupted");
                    outcome = SearchOutcome::Cancelled;
                    break;
                }
            };

            step.healthy = self.thresholds.is_healthy(&step);
            metrics::record_step(step.healthy);

            tracing::info!(
                level,
                success = step.success_count,
                failures = step.failure_count,
                success_rate = step.success_rate,
                avg_latency_ms = ?step.avg_latency_ms,
                max_latency_ms = ?step.max_latency_ms,
                healthy = step.healthy,
                "Capacity step complete"
            );

            let healthy = step.healthy;
            report.record(level, step);
            if !healthy {
                outcome = SearchOutcome::StoppedEarly;
                break;
            }
        }

        report.outcome = outcome;
        metrics::record_max_healthy(report.max_healthy_requests);
        tracing::info!(
            max_healthy_requests = report.max_healthy_requests,
            attempted = report.steps.len(),
            outcome = ?report.outcome,
            "Capacity search finished"
        );
        report
    }
}
