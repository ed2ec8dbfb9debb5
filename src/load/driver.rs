//! Load driver: one step of N requests against a target.
//!
//! # Responsibilities
//! - Issue exactly N GET requests with bounded concurrency
//! - Bound every request by its own timer; expiry drops (cancels) the request
//! - Fold every outcome into a single [`StepResult`]
//! - Abandon the step as a whole on shutdown, never half-aggregated
//!
//! # Design Decisions
//! - Requests are independent; aggregation is order-insensitive
//! - A failed request is data, not an error: the batch always runs to the end
//! - The driver holds no per-run state, so one instance serves all callers

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tokio::time::{self, Instant};
use url::Url;

use crate::lifecycle::ShutdownSignal;
use crate::load::latency::StepAccumulator;
use crate::load::outcome::{classify_error, classify_status};
use crate::load::probe::HttpProbe;
use crate::load::types::{LoadError, LoadRequestSpec, LoadResult, ProbeError, RequestOutcome, StepResult};
use crate::observability::metrics;

pub struct LoadDriver {
    probe: Arc<dyn HttpProbe>,
    max_in_flight: usize,
}

impl LoadDriver {
    pub fn new(probe: Arc<dyn HttpProbe>, max_in_flight: usize) -> Self {
        Self {
            probe,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Run one step. The returned step is unjudged (`healthy == false`).
    pub async fn run(
        &self,
        spec: &LoadRequestSpec,
        shutdown: &mut ShutdownSignal,
    ) -> LoadResult<StepResult> {
        let url = spec.url();
        let timeout = spec.timeout();

        tracing::debug!(
            url = %url,
            requests = spec.requests(),
            timeout_ms = timeout.as_millis() as u64,
            max_in_flight = self.max_in_flight,
            "Starting load step"
        );

        let step = async {
            let mut attempts = stream::iter(0..spec.requests())
                .map(|_| self.attempt(url, timeout))
                .buffer_unordered(self.max_in_flight);

            let mut acc = StepAccumulator::new();
            while let Some(outcome) = attempts.next().await {
                acc.record(&outcome);
            }
            acc.finish()
        };

        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::warn!(url = %url, requests = spec.requests(), "Load step cancelled by shutdown");
                Err(LoadError::Cancelled)
            }
            result = step => Ok(result),
        }
    }

    async fn attempt(&self, url: &Url, timeout: Duration) -> RequestOutcome {
        let start = Instant::now();
        let result = time::timeout(timeout, self.probe.get(url, timeout)).await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(Ok(status)) => classify_status(status, elapsed),
            Ok(Err(e)) => {
                tracing::debug!(url = %url, error = %e, "Probe request failed");
                classify_error(&e, elapsed)
            }
            Err(_) => {
                tracing::debug!(url = %url, timeout_ms = timeout.as_millis() as u64, "Probe request timed out");
                classify_error(&ProbeError::Timeout(timeout), elapsed)
            }
        };

        metrics::record_probe(outcome.is_success(), elapsed);
        outcome
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted probes for exercising the engine without sockets.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use url::Url;

    use crate::load::probe::HttpProbe;
    use crate::load::types::ProbeError;

    /// What the n-th call of a [`ScriptedProbe`] does.
    #[derive(Debug, Clone)]
    pub enum Reply {
        Status(u16, Duration),
        Error(Duration),
        Hang,
    }

    /// Replays a fixed list of replies in call order, then a fallback.
    pub struct ScriptedProbe {
        replies: Vec<Reply>,
        fallback: Reply,
        calls: AtomicUsize,
        completed: AtomicUsize,
    }

    impl ScriptedProbe {
        pub fn new(replies: Vec<Reply>, fallback: Reply) -> Self {
            Self {
                replies,
                fallback,
                calls: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
            }
        }

        pub fn always(reply: Reply) -> Self {
            Self::new(Vec::new(), reply)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn completed(&self) -> usize {
            self.completed.load(Ordering::SeqCst)
        }
    }

    impl HttpProbe for ScriptedProbe {
        fn get<'a>(&'a self, _url: &'a Url, _timeout: Duration) -> BoxFuture<'a, Result<u16, ProbeError>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.replies.get(n).unwrap_or(&self.fallback).clone();
            async move {
                let result = match reply {
                    Reply::Status(status, delay) => {
                        tokio::time::sleep(delay).await;
                        Ok(status)
                    }
                    Reply::Error(delay) => {
                        tokio::time::sleep(delay).await;
                        Err(ProbeError::Connect("connection refused".into()))
                    }
                    Reply::Hang => std::future::pending().await,
                };
                self.completed.fetch_add(1, Ordering::SeqCst);
                result
            }
            .boxed()
        }
    }
}
