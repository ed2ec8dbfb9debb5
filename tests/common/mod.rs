//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

use netdiag::config::ServiceConfig;
use netdiag::diagnostics::{CommandError, CommandOutput, CommandRunner, HostResolver, ResolveError};
use netdiag::http::{build_router, AppState};
use netdiag::lifecycle::Shutdown;
use netdiag::load::{HttpProbe, ProbeError, ReqwestProbe};

/// Start a programmable backend on an ephemeral port.
///
/// The closure receives the zero-based connection index and returns the
/// status and body to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let counter = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let index = counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f(index).await;
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Backend that always answers with `status` after `delay`.
pub async fn start_fixed_backend(status: u16, delay: Duration) -> SocketAddr {
    start_programmable_backend(move |_| async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        (status, "ok".to_string())
    })
    .await
}

/// Backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Real probe that ignores any proxy settings in the environment.
pub fn direct_probe() -> ReqwestProbe {
    let client = reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    ReqwestProbe::from_client(client)
}

/// Probe answering from a closure over the call index, without sockets.
pub struct FnProbe<F> {
    calls: AtomicUsize,
    reply: F,
}

impl<F> FnProbe<F>
where
    F: Fn(usize) -> Result<u16, ProbeError> + Send + Sync,
{
    pub fn new(reply: F) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<F> HttpProbe for FnProbe<F>
where
    F: Fn(usize) -> Result<u16, ProbeError> + Send + Sync,
{
    fn get<'a>(&'a self, _url: &'a Url, _timeout: Duration) -> BoxFuture<'a, Result<u16, ProbeError>> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let result = (self.reply)(index);
        async move { result }.boxed()
    }
}

/// Command runner that records argv and returns a canned result.
pub struct FakeRunner {
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
    reply: Result<CommandOutput, CommandError>,
}

impl FakeRunner {
    pub fn replying(output: &str, exit_code: i32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(CommandOutput {
                output: output.to_string(),
                exit_code,
            }),
        }
    }

    pub fn failing(error: CommandError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(error),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<CommandOutput, CommandError>> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        let reply = self.reply.clone();
        async move { reply }.boxed()
    }
}

/// Resolver returning a fixed answer.
pub struct FakeResolver(pub Result<Vec<String>, ResolveError>);

impl HostResolver for FakeResolver {
    fn resolve<'a>(&'a self, _hostname: &'a str) -> BoxFuture<'a, Result<Vec<String>, ResolveError>> {
        let answer = self.0.clone();
        async move { answer }.boxed()
    }
}

/// Router wired to the given probe, a quiet runner and a resolver.
pub fn test_router(
    config: &ServiceConfig,
    probe: Arc<dyn HttpProbe>,
    runner: Arc<dyn CommandRunner>,
    resolver: Arc<dyn HostResolver>,
) -> Router {
    let state = AppState::with_collaborators(config, probe, runner, resolver, Arc::new(Shutdown::new()));
    build_router(config, state)
}

pub fn quiet_runner() -> Arc<dyn CommandRunner> {
    Arc::new(FakeRunner::replying("", 0))
}

pub fn local_resolver() -> Arc<dyn HostResolver> {
    Arc::new(FakeResolver(Ok(vec!["127.0.0.1".to_string()])))
}

/// Send one request through the router and decode the JSON answer.
pub async fn call(router: &Router, request: Request<Body>) -> (u16, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
