//! Load generation subsystem.
//!
//! # Data Flow
//! ```text
//! LoadRequestSpec (validated url, N, timeout)
//!     → driver.rs (N attempts, bounded in-flight, one timer each)
//!     → probe.rs (single GET through the HTTP client)
//!     → outcome.rs (status/error → success | failure)
//!     → latency.rs (samples → count/min/avg/max, counts → StepResult)
//! ```
//!
//! # Design Decisions
//! - Per-request failures are measurements, never propagated as errors
//! - Failed attempts still contribute their elapsed time as a latency sample
//! - Only malformed input or shutdown end a run without a StepResult

pub mod driver;
pub mod latency;
pub mod outcome;
pub mod probe;
pub mod types;

pub use driver::LoadDriver;
pub use latency::{LatencyRecorder, StepAccumulator};
pub use probe::{HttpProbe, ReqwestProbe};
pub use types::{
    Classification, LatencySummary, LoadError, LoadRequestSpec, LoadResult, LoadTestReport,
    ProbeError, RequestOutcome, StepResult,
};
