use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{
    CapacityReport, CapacityTestRequest, DnsReport, LoadTestRequest, LoadTestResponse, PingReport,
    ToolReport,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service answered with a non-success status and an `{"error": ...}` body.
    #[error("service returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin typed client for the netdiag API.
pub struct DiagClient {
    client: Client,
    base_url: String,
}

impl DiagClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness check; returns the `status` field.
    pub async fn ping(&self) -> Result<String, ClientError> {
        let resp = self
            .client
            .get(format!("{}/api/ping", self.base_url))
            .send()
            .await?;
        let body: Value = decode(resp).await?;
        Ok(body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Run a single fixed-size load test against `url`.
    pub async fn run_load_test(
        &self,
        url: &str,
        requests: Option<i64>,
        timeout: Option<f64>,
    ) -> Result<LoadTestResponse, ClientError> {
        let req = LoadTestRequest {
            url: url.to_string(),
            requests,
            timeout,
        };
        self.post("/api/http-load-test", &req).await
    }

    /// Run a stepped capacity search against `url`.
    pub async fn run_capacity_test(
        &self,
        url: &str,
        levels: Option<Vec<u32>>,
        timeout: Option<f64>,
    ) -> Result<CapacityReport, ClientError> {
        let req = CapacityTestRequest {
            url: url.to_string(),
            levels,
            timeout,
        };
        self.post("/api/capacity-test", &req).await
    }

    pub async fn service_scan(&self, target: &str) -> Result<ToolReport, ClientError> {
        self.post("/api/test-nmap", &json!({ "target": target })).await
    }

    pub async fn ping_stats(&self, target: &str, count: Option<i64>) -> Result<PingReport, ClientError> {
        let mut body = json!({ "target": target });
        if let Some(count) = count {
            body["count"] = json!(count);
        }
        self.post("/api/ping-stats", &body).await
    }

    pub async fn traceroute(&self, target: &str, max_hops: Option<i64>) -> Result<ToolReport, ClientError> {
        let mut body = json!({ "target": target });
        if let Some(hops) = max_hops {
            body["max_hops"] = json!(hops);
        }
        self.post("/api/traceroute", &body).await
    }

    pub async fn dns_lookup(&self, hostname: &str) -> Result<DnsReport, ClientError> {
        self.post("/api/dns-lookup", &json!({ "hostname": hostname })).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text);
        return Err(ClientError::Api { status, message });
    }

    Ok(serde_json::from_str(&text)?)
}
