//! Network diagnostics service with an HTTP load and capacity engine.

pub mod capacity;
pub mod config;
pub mod diagnostics;
pub mod http;
pub mod lifecycle;
pub mod load;
pub mod observability;

pub use capacity::{CapacityPlan, CapacityReport, CapacitySearch, Thresholds};
pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use load::{LoadDriver, LoadRequestSpec, StepResult};
