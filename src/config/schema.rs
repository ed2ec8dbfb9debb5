//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::capacity::Thresholds;

/// Root configuration for the diagnostics service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// API-level HTTP settings.
    pub http: HttpConfig,

    /// Load driver settings.
    pub load: LoadConfig,

    /// Capacity search settings.
    pub capacity: CapacityConfig,

    /// External diagnostic tools.
    pub diagnostics: DiagnosticsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Upper bound on a single API call, in seconds.
    ///
    /// A capacity search runs several steps back to back, so this is
    /// deliberately much larger than the per-request probe timeout.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Answer CORS preflights for any origin on `/api/*`.
    pub cors_allow_any_origin: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 900,
            max_body_size: 64 * 1024,
            cors_allow_any_origin: true,
        }
    }
}

/// Load driver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Request count used when a load test omits `requests`.
    pub default_requests: i64,

    /// Per-request timeout used when a call omits `timeout`, in seconds.
    pub default_timeout_secs: f64,

    /// Maximum requests in flight within one step.
    pub max_in_flight: usize,

    /// User-Agent header sent with every probe request.
    pub user_agent: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            default_requests: 50,
            default_timeout_secs: 5.0,
            max_in_flight: 32,
            user_agent: concat!("netdiag-load/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Capacity search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CapacityConfig {
    /// Levels used when a capacity test omits `steps`.
    pub default_levels: Vec<u32>,

    /// Health thresholds applied to every step.
    pub thresholds: Thresholds,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            default_levels: vec![10, 25, 50, 100],
            thresholds: Thresholds::default(),
        }
    }
}

/// External diagnostic tool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Expose the nmap/ping/traceroute/dns endpoints.
    pub enabled: bool,

    pub nmap_program: String,
    pub ping_program: String,
    pub traceroute_program: String,

    /// Echo requests sent when `count` is omitted.
    pub default_ping_count: i64,

    /// Hop limit used when `max_hops` is omitted.
    pub default_max_hops: i64,

    /// Hard limit on a single tool invocation, in seconds.
    pub command_timeout_secs: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            nmap_program: "nmap".to_string(),
            ping_program: "ping".to_string(),
            traceroute_program: "traceroute".to_string(),
            default_ping_count: 4,
            default_max_hops: 20,
            command_timeout_secs: 120,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
