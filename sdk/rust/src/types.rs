use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTestRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadTestResponse {
    pub url: String,
    pub total_requests: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub avg_latency_ms: Option<f64>,
    pub min_latency_ms: Option<f64>,
    pub max_latency_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityTestRequest {
    pub url: String,
    /// Levels to try; the server default is used when `None`.
    #[serde(rename = "steps", skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub requests: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub success_rate: f64,
    pub avg_latency_ms: Option<f64>,
    pub min_latency_ms: Option<f64>,
    pub max_latency_ms: Option<f64>,
    pub healthy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_success_rate: f64,
    pub max_avg_latency_ms: f64,
    pub max_max_latency_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    pub url: String,
    pub levels: Vec<u32>,
    pub steps: Vec<u32>,
    pub results: Vec<StepResult>,
    pub max_healthy_requests: u32,
    pub thresholds: Thresholds,
    /// "exhausted", "stopped_early" or "cancelled".
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReport {
    pub target: String,
    pub exit_code: i32,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingReport {
    pub target: String,
    pub exit_code: i32,
    pub output: String,
    pub packet_loss: Option<String>,
    pub min_rtt_ms: Option<f64>,
    pub avg_rtt_ms: Option<f64>,
    pub max_rtt_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsReport {
    pub hostname: String,
    pub addresses: Vec<String>,
}
