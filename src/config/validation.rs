//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, thresholds in range, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("capacity.default_levels: must contain at least one level")]
    NoDefaultLevels,

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration, returning every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "http.request_timeout_secs" });
    }
    if config.http.max_body_size == 0 {
        errors.push(ValidationError::NotPositive { field: "http.max_body_size" });
    }

    if config.load.default_requests < 1 {
        errors.push(ValidationError::NotPositive { field: "load.default_requests" });
    }
    if !(config.load.default_timeout_secs.is_finite() && config.load.default_timeout_secs > 0.0) {
        errors.push(ValidationError::NotPositive { field: "load.default_timeout_secs" });
    }
    if config.load.max_in_flight == 0 {
        errors.push(ValidationError::NotPositive { field: "load.max_in_flight" });
    }

    if config.capacity.default_levels.is_empty() {
        errors.push(ValidationError::NoDefaultLevels);
    } else if config.capacity.default_levels.contains(&0) {
        errors.push(ValidationError::NotPositive { field: "capacity.default_levels" });
    }

    let thresholds = &config.capacity.thresholds;
    if !(0.0..=1.0).contains(&thresholds.min_success_rate) {
        errors.push(ValidationError::OutOfRange {
            field: "capacity.thresholds.min_success_rate",
            value: thresholds.min_success_rate,
            min: 0.0,
            max: 1.0,
        });
    }
    if !(thresholds.max_avg_latency_ms > 0.0) {
        errors.push(ValidationError::NotPositive { field: "capacity.thresholds.max_avg_latency_ms" });
    }
    if !(thresholds.max_max_latency_ms > 0.0) {
        errors.push(ValidationError::NotPositive { field: "capacity.thresholds.max_max_latency_ms" });
    }

    if config.diagnostics.command_timeout_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "diagnostics.command_timeout_secs" });
    }
    if config.diagnostics.default_ping_count < 1 {
        errors.push(ValidationError::NotPositive { field: "diagnostics.default_ping_count" });
    }
    if config.diagnostics.default_max_hops < 1 {
        errors.push(ValidationError::NotPositive { field: "diagnostics.default_max_hops" });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
