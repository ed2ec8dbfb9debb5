//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared application state from configuration
//! - Create the Axum Router with all API handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout, body limit)
//! - Serve until shutdown, draining in-flight calls

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::capacity::CapacitySearch;
use crate::config::{LoadConfig, ServiceConfig};
use crate::diagnostics::{
    CommandRunner, Diagnostics, HostResolver, SystemCommandRunner, SystemResolver,
};
use crate::http::handlers;
use crate::http::request::{request_span, RequestIdGenerator};
use crate::lifecycle::Shutdown;
use crate::load::{HttpProbe, LoadDriver, ReqwestProbe};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub driver: Arc<LoadDriver>,
    pub capacity: Arc<CapacitySearch>,
    pub diagnostics: Arc<Diagnostics>,
    pub load: LoadConfig,
    pub default_levels: Vec<u32>,
    pub shutdown: Arc<Shutdown>,
}

impl AppState {
    /// Build state backed by the real HTTP client, process runner and resolver.
    pub fn from_config(config: &ServiceConfig, shutdown: Arc<Shutdown>) -> Result<Self, reqwest::Error> {
        let probe = ReqwestProbe::new(&config.load.user_agent)?;
        let runner = SystemCommandRunner::new(Duration::from_secs(config.diagnostics.command_timeout_secs));

        Ok(Self::with_collaborators(
            config,
            Arc::new(probe),
            Arc::new(runner),
            Arc::new(SystemResolver),
            shutdown,
        ))
    }

    /// Build state around explicit collaborators.
    pub fn with_collaborators(
        config: &ServiceConfig,
        probe: Arc<dyn HttpProbe>,
        runner: Arc<dyn CommandRunner>,
        resolver: Arc<dyn HostResolver>,
        shutdown: Arc<Shutdown>,
    ) -> Self {
        let driver = Arc::new(LoadDriver::new(probe, config.load.max_in_flight));
        let capacity = Arc::new(CapacitySearch::new(driver.clone(), config.capacity.thresholds));
        let diagnostics = Arc::new(Diagnostics::new(runner, resolver, config.diagnostics.clone()));

        Self {
            driver,
            capacity,
            diagnostics,
            load: config.load.clone(),
            default_levels: config.capacity.default_levels.clone(),
            shutdown,
        }
    }
}

/// HTTP server for the diagnostics API.
pub struct HttpServer {
    router: Router,
    shutdown: Arc<Shutdown>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and state.
    pub fn new(config: &ServiceConfig, state: AppState) -> Self {
        let shutdown = state.shutdown.clone();
        let router = build_router(config, state);
        Self { router, shutdown }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shared shutdown is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut signal = self.shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { signal.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    let mut api = Router::new()
        .route("/api/ping", get(handlers::ping))
        .route("/api/http-load-test", post(handlers::http_load_test))
        .route("/api/capacity-test", post(handlers::capacity_test));

    if config.diagnostics.enabled {
        api = api
            .route("/api/test-nmap", post(handlers::service_scan))
            .route("/api/ping-stats", post(handlers::ping_stats))
            .route("/api/traceroute", post(handlers::traceroute))
            .route("/api/dns-lookup", post(handlers::dns_lookup));
    }

    let mut router = api
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.http.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.http.request_timeout_secs)));

    if config.http.cors_allow_any_origin {
        router = router.layer(cors_layer());
    }

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
