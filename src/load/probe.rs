//! HTTP probe: the single GET a load step is made of.
//!
//! # Responsibilities
//! - Issue one GET and report the final status code
//! - Read the body so latency covers the whole exchange
//! - Translate client errors into [`ProbeError`]
//!
//! The driver owns the timeout; dropping the returned future aborts the
//! underlying connection.

use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use url::Url;

use crate::load::types::ProbeError;

/// Something that can perform one HTTP GET.
pub trait HttpProbe: Send + Sync {
    fn get<'a>(&'a self, url: &'a Url, timeout: Duration) -> BoxFuture<'a, Result<u16, ProbeError>>;
}

/// Probe backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl ReqwestProbe {
    /// Build a probe that opens a fresh connection for every request.
    ///
    /// Idle pooling is disabled so a step never inherits warm connections
    /// (or half-dead ones) from the previous step.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpProbe for ReqwestProbe {
    fn get<'a>(&'a self, url: &'a Url, timeout: Duration) -> BoxFuture<'a, Result<u16, ProbeError>> {
        async move {
            let response = self
                .client
                .get(url.clone())
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            let status = response.status().as_u16();
            response
                .bytes()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            Ok(status)
        }
        .boxed()
    }
}

fn map_reqwest_error(error: reqwest::Error, timeout: Duration) -> ProbeError {
    if error.is_timeout() {
        ProbeError::Timeout(timeout)
    } else if error.is_connect() {
        ProbeError::Connect(error.to_string())
    } else {
        ProbeError::Transport(error.to_string())
    }
}
