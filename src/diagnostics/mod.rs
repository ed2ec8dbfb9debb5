//! Network diagnostics subsystem.
//!
//! # Data Flow
//! ```text
//! API request (target, options)
//!     → Diagnostics (validate target, build argv)
//!     → command.rs (run nmap / ping / traceroute, capture output)
//!     → ping.rs (packet loss + RTT extraction, ping only)
//!
//! API request (hostname)
//!     → dns.rs (resolve to sorted, unique addresses)
//! ```
//!
//! # Design Decisions
//! - Tools are never run through a shell; the target is one argv element
//! - Tool output is returned verbatim; only ping gets substring extraction

pub mod command;
pub mod dns;
pub mod ping;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::DiagnosticsConfig;
use crate::observability::metrics;

pub use command::{CommandError, CommandOutput, CommandRunner, SystemCommandRunner};
pub use dns::{HostResolver, ResolveError, SystemResolver};
pub use ping::PingSummary;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticsError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Raw tool run, as returned by nmap and traceroute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolReport {
    pub target: String,
    pub exit_code: i32,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingReport {
    pub target: String,
    pub exit_code: i32,
    pub output: String,
    #[serde(flatten)]
    pub summary: PingSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsReport {
    pub hostname: String,
    pub addresses: Vec<String>,
}

/// Front for the external diagnostic collaborators.
pub struct Diagnostics {
    runner: Arc<dyn CommandRunner>,
    resolver: Arc<dyn HostResolver>,
    config: DiagnosticsConfig,
}

impl Diagnostics {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        resolver: Arc<dyn HostResolver>,
        config: DiagnosticsConfig,
    ) -> Self {
        Self { runner, resolver, config }
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    /// `nmap -sV <target>`
    pub async fn service_scan(&self, target: &str) -> Result<ToolReport, DiagnosticsError> {
        let target = validate_target(target, "target")?;
        let args = vec!["-sV".to_string(), target.clone()];
        let out = self.execute(&self.config.nmap_program, &args).await?;
        Ok(ToolReport {
            target,
            exit_code: out.exit_code,
            output: out.output,
        })
    }

    /// `ping -c <count> <target>`, plus the extracted summary.
    pub async fn ping(&self, target: &str, count: Option<i64>) -> Result<PingReport, DiagnosticsError> {
        let target = validate_target(target, "target")?;
        let count = count.unwrap_or(self.config.default_ping_count);
        if count < 1 {
            return Err(DiagnosticsError::InvalidInput("count must be >= 1".into()));
        }

        let args = vec!["-c".to_string(), count.to_string(), target.clone()];
        let out = self.execute(&self.config.ping_program, &args).await?;
        let summary = ping::summarize(&out.output);
        Ok(PingReport {
            target,
            exit_code: out.exit_code,
            output: out.output,
            summary,
        })
    }

    /// `traceroute -m <max_hops> <target>`
    pub async fn traceroute(&self, target: &str, max_hops: Option<i64>) -> Result<ToolReport, DiagnosticsError> {
        let target = validate_target(target, "target")?;
        let max_hops = max_hops.unwrap_or(self.config.default_max_hops);
        if max_hops < 1 {
            return Err(DiagnosticsError::InvalidInput("max_hops must be >= 1".into()));
        }

        let args = vec!["-m".to_string(), max_hops.to_string(), target.clone()];
        let out = self.execute(&self.config.traceroute_program, &args).await?;
        Ok(ToolReport {
            target,
            exit_code: out.exit_code,
            output: out.output,
        })
    }

    /// Resolve `hostname`. The outer error is for bad input; the inner one
    /// is a resolution failure that still names the host.
    pub async fn lookup(
        &self,
        hostname: &str,
    ) -> Result<Result<DnsReport, ResolveError>, DiagnosticsError> {
        let hostname = validate_target(hostname, "hostname")?;
        let resolved = self.resolver.resolve(&hostname).await;
        if let Err(e) = &resolved {
            tracing::warn!(hostname = %hostname, error = %e, "DNS lookup failed");
        }
        Ok(resolved.map(|addresses| DnsReport { hostname, addresses }))
    }

    async fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        let result = self.runner.run(program, args).await;
        match &result {
            Ok(out) => {
                tracing::info!(program, exit_code = out.exit_code, "Command finished");
                metrics::record_command(program, "ok");
            }
            Err(e) => {
                tracing::warn!(program, error = %e, "Command failed");
                metrics::record_command(program, "error");
            }
        }
        result
    }
}

fn validate_target(raw: &str, field: &str) -> Result<String, DiagnosticsError> {
    let target = raw.trim();
    if target.is_empty() {
        return Err(DiagnosticsError::InvalidInput(format!("{} is required", field)));
    }
    if target.starts_with('-') {
        return Err(DiagnosticsError::InvalidInput(format!("{} must not start with '-'", field)));
    }
    Ok(target.to_string())
}
