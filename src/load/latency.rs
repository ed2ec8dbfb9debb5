//! Latency sample accumulation.

use std::time::Duration;

use crate::load::types::{LatencySummary, RequestOutcome, StepResult};

/// Collects elapsed-time samples for one batch of requests.
#[derive(Debug, Default, Clone)]
pub struct LatencyRecorder {
    samples_ms: Vec<f64>,
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.samples_ms.push(elapsed.as_nanos() as f64 / 1_000_000.0);
    }

    pub fn len(&self) -> usize {
        self.samples_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples_ms.is_empty()
    }

    /// Reduce to min/avg/max, or `None` when nothing was recorded.
    pub fn summary(&self) -> Option<LatencySummary> {
        if self.samples_ms.is_empty() {
            return None;
        }

        let (min, max, sum) = self.samples_ms.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &s| (min.min(s), max.max(s), sum + s),
        );

        Some(LatencySummary {
            count: self.samples_ms.len(),
            min_ms: min,
            avg_ms: sum / self.samples_ms.len() as f64,
            max_ms: max,
        })
    }
}

/// Folds request outcomes into a [`StepResult`].
///
/// Every attempt feeds the latency recorder, failed ones included.
#[derive(Debug, Default)]
pub struct StepAccumulator {
    success: u32,
    failure: u32,
    latency: LatencyRecorder,
}

impl StepAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &RequestOutcome) {
        if outcome.is_success() {
            self.success += 1;
        } else {
            self.failure += 1;
        }
        self.latency.record(outcome.elapsed);
    }

    pub fn finish(self) -> StepResult {
        StepResult::new(self.success, self.failure, self.latency.summary())
    }
}
