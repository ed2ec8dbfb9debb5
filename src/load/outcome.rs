//! Outcome classification for single requests.
//!
//! A request succeeds iff a response arrived with a status in `[200, 400)`.
//! Redirect statuses count as success; every transport error is a failure.
//! There are no retries here: one attempt, one outcome.

use std::ops::Range;
use std::time::Duration;

use crate::load::types::{Classification, ProbeError, RequestOutcome};

const SUCCESS_STATUSES: Range<u16> = 200..400;

/// Classify a request that produced a response.
pub fn classify_status(status: u16, elapsed: Duration) -> RequestOutcome {
    let classification = if SUCCESS_STATUSES.contains(&status) {
        Classification::Success
    } else {
        Classification::Failure
    };

    RequestOutcome {
        elapsed,
        classification,
        detail: Some(format!("status {}", status)),
    }
}

/// Classify a request that ended without a response.
pub fn classify_error(error: &ProbeError, elapsed: Duration) -> RequestOutcome {
    RequestOutcome {
        elapsed,
        classification: Classification::Failure,
        detail: Some(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_boundaries() {
        let d = Duration::from_millis(5);
        assert!(!classify_status(199, d).is_success());
        assert!(classify_status(200, d).is_success());
        assert!(classify_status(204, d).is_success());
        assert!(classify_status(302, d).is_success());
        assert!(classify_status(399, d).is_success());
        assert!(!classify_status(400, d).is_success());
        assert!(!classify_status(503, d).is_success());
        assert!(!classify_status(100, d).is_success());
    }

    #[test]
    fn test_errors_are_failures_with_elapsed() {
        let d = Duration::from_millis(1500);
        let outcome = classify_error(&ProbeError::Timeout(Duration::from_secs(1)), d);
        assert_eq!(outcome.classification, Classification::Failure);
        assert_eq!(outcome.elapsed, d);
        assert!(outcome.detail.unwrap().contains("timed out"));

        let outcome = classify_error(&ProbeError::Connect("refused".into()), d);
        assert!(!outcome.is_success());
    }
}
