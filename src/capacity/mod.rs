//! Capacity evaluation subsystem.
//!
//! # Data Flow
//! ```text
//! raw levels (JSON array)
//!     → levels.rs (filter, coerce, sort, dedup)
//!     → controller.rs (one load step per level, in order)
//!         → load::LoadDriver (StepResult)
//!         → health.rs (Thresholds verdict)
//!     → CapacityReport (steps, results, max healthy level)
//! ```
//!
//! # Design Decisions
//! - Thresholds are an injected value, fixed for the lifetime of the process
//! - The search stops at the first unhealthy level; nothing runs speculatively
//! - The controller alone owns the report while it is being built

pub mod controller;
pub mod health;
pub mod levels;

pub use controller::{CapacityPlan, CapacityReport, CapacitySearch, SearchOutcome};
pub use health::Thresholds;
pub use levels::{integer_from_value, normalize_levels};
