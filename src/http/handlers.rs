//! API handlers.
//!
//! Bodies are read through [`JsonBody`], so omitted fields fall back to the
//! configured defaults before validation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::capacity::{CapacityPlan, CapacityReport};
use crate::diagnostics::{PingReport, ToolReport};
use crate::http::request::JsonBody;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::load::{LoadRequestSpec, LoadTestReport};

/// Liveness check.
pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `{url, requests?, timeout?}` → one load step, no verdict.
pub async fn http_load_test(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<LoadTestReport>, ApiError> {
    let url = body.string("url");
    let requests = body.integer("requests")?.unwrap_or(state.load.default_requests);
    let timeout = body.float("timeout")?.unwrap_or(state.load.default_timeout_secs);

    let spec = LoadRequestSpec::new(&url, requests, timeout)?;
    tracing::info!(url = %spec.url(), requests = spec.requests(), "HTTP load test starting");

    let step = state.driver.run(&spec, &mut state.shutdown.subscribe()).await?;
    tracing::info!(
        url = %spec.url(),
        success = step.success_count,
        failures = step.failure_count,
        avg_latency_ms = ?step.avg_latency_ms,
        "HTTP load test finished"
    );

    Ok(Json(LoadTestReport::from_step(spec.url().as_str(), &step)))
}

/// `{url, steps?, timeout?}` → escalating search for the largest healthy level.
pub async fn capacity_test(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<CapacityReport>, ApiError> {
    let url = body.string("url");
    let levels = match body.array("steps")? {
        Some(levels) => levels,
        None => state.default_levels.iter().map(|&l| Value::from(l)).collect(),
    };
    let timeout = body.float("timeout")?.unwrap_or(state.load.default_timeout_secs);

    let plan = CapacityPlan::new(&url, &levels, timeout)?;
    let report = state.capacity.run(&plan, &mut state.shutdown.subscribe()).await;
    Ok(Json(report))
}

/// `{target}` → `nmap -sV <target>`.
pub async fn service_scan(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<ToolReport>, ApiError> {
    let report = state.diagnostics.service_scan(&body.string("target")).await?;
    Ok(Json(report))
}

/// `{target, count?}` → `ping -c <count> <target>` with extracted stats.
pub async fn ping_stats(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<PingReport>, ApiError> {
    let count = body.integer("count")?;
    let report = state.diagnostics.ping(&body.string("target"), count).await?;
    Ok(Json(report))
}

/// `{target, max_hops?}` → `traceroute -m <max_hops> <target>`.
pub async fn traceroute(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<ToolReport>, ApiError> {
    let max_hops = body.integer("max_hops")?;
    let report = state.diagnostics.traceroute(&body.string("target"), max_hops).await?;
    Ok(Json(report))
}

/// `{hostname}` → resolved addresses; resolution failures answer 500 with
/// the hostname and an empty address list.
pub async fn dns_lookup(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let hostname = body.string("hostname");
    match state.diagnostics.lookup(&hostname).await? {
        Ok(report) => Ok(Json(report).into_response()),
        Err(e) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "hostname": hostname,
                "error": e.to_string(),
                "addresses": [],
            })),
        )
            .into_response()),
    }
}
