//! Step health thresholds and verdicts.

use serde::{Deserialize, Serialize};

use crate::load::StepResult;

/// Limits a step must stay within to count as healthy.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Thresholds {
    pub min_success_rate: f64,
    pub max_avg_latency_ms: f64,
    pub max_max_latency_ms: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_success_rate: 0.95,
            max_avg_latency_ms: 300.0,
            max_max_latency_ms: 1000.0,
        }
    }
}

impl Thresholds {
    /// Judge a step. Undefined latency is never healthy.
    pub fn is_healthy(&self, step: &StepResult) -> bool {
        let (Some(avg), Some(max)) = (step.avg_latency_ms, step.max_latency_ms) else {
            return false;
        };

        step.success_rate >= self.min_success_rate
            && avg <= self.max_avg_latency_ms
            && max <= self.max_max_latency_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::LatencySummary;

    fn step(success: u32, failure: u32, avg: f64, max: f64) -> StepResult {
        StepResult::new(
            success,
            failure,
            Some(LatencySummary {
                count: (success + failure) as usize,
                min_ms: 1.0,
                avg_ms: avg,
                max_ms: max,
            }),
        )
    }

    #[test]
    fn test_healthy_within_limits() {
        assert!(Thresholds::default().is_healthy(&step(100, 0, 50.0, 200.0)));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let t = Thresholds::default();
        assert!(t.is_healthy(&step(95, 5, 300.0, 1000.0)));
        assert!(!t.is_healthy(&step(94, 6, 300.0, 1000.0)));
        assert!(!t.is_healthy(&step(100, 0, 300.001, 1000.0)));
        assert!(!t.is_healthy(&step(100, 0, 300.0, 1000.001)));
    }

    #[test]
    fn test_undefined_latency_is_unhealthy() {
        let lenient = Thresholds {
            min_success_rate: 0.0,
            max_avg_latency_ms: f64::MAX,
            max_max_latency_ms: f64::MAX,
        };
        for t in [Thresholds::default(), lenient] {
            assert!(!t.is_healthy(&StepResult::new(10, 0, None)));
            assert!(!t.is_healthy(&StepResult::new(0, 10, None)));
        }
    }

    #[test]
    fn test_injected_thresholds() {
        let strict = Thresholds {
            min_success_rate: 1.0,
            max_avg_latency_ms: 10.0,
            max_max_latency_ms: 20.0,
        };
        assert!(strict.is_healthy(&step(10, 0, 10.0, 20.0)));
        assert!(!strict.is_healthy(&step(9, 1, 5.0, 5.0)));
    }

    #[test]
    fn test_partial_thresholds_deserialize() {
        let t: Thresholds = serde_json::from_str(r#"{"max_avg_latency_ms": 120.0}"#).unwrap();
        assert_eq!(t.max_avg_latency_ms, 120.0);
        assert_eq!(t.min_success_rate, 0.95);
    }
}
