//! SDK client against a served instance on an ephemeral port.

use std::sync::Arc;

use netdiag::config::ServiceConfig;
use netdiag::http::{AppState, HttpServer};
use netdiag::lifecycle::Shutdown;
use netdiag_sdk::{ClientError, DiagClient};
use tokio::net::TcpListener;

mod common;

use common::{FakeResolver, FnProbe};

async fn serve(config: ServiceConfig) -> (DiagClient, Arc<Shutdown>) {
    let shutdown = Arc::new(Shutdown::new());
    let state = AppState::with_collaborators(
        &config,
        Arc::new(FnProbe::new(|i| if i % 10 == 9 { Ok(500) } else { Ok(200) })),
        common::quiet_runner(),
        Arc::new(FakeResolver(Ok(vec!["10.1.2.3".to_string()]))),
        shutdown.clone(),
    );
    let server = HttpServer::new(&config, state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    (DiagClient::with_client(client, &format!("http://{}/", addr)), shutdown)
}

#[tokio::test]
async fn test_sdk_round_trip() {
    let (client, shutdown) = serve(ServiceConfig::default()).await;

    assert_eq!(client.ping().await.unwrap(), "ok");

    let load = client
        .run_load_test("http://target.test/", Some(20), Some(1.0))
        .await
        .unwrap();
    assert_eq!(load.total_requests, 20);
    assert_eq!(load.success_count, 18);
    assert_eq!(load.failure_count, 2);

    let dns = client.dns_lookup("example.com").await.unwrap();
    assert_eq!(dns.addresses, vec!["10.1.2.3".to_string()]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_sdk_capacity_report() {
    let (client, shutdown) = serve(ServiceConfig::default()).await;

    // Every tenth call fails: level 5 is clean, level 20 sits at 0.9.
    let report = client
        .run_capacity_test("http://target.test/", Some(vec![20, 5]), None)
        .await
        .unwrap();

    assert_eq!(report.levels, vec![5, 20]);
    assert_eq!(report.steps, vec![5, 20]);
    assert_eq!(report.max_healthy_requests, 5);
    assert_eq!(report.outcome, "stopped_early");
    assert!(report.results[0].healthy);
    assert!(!report.results[1].healthy);

    shutdown.trigger();
}

#[tokio::test]
async fn test_sdk_surfaces_api_errors() {
    let (client, shutdown) = serve(ServiceConfig::default()).await;

    let err = client.run_load_test("", None, None).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "url is required");
        }
        other => panic!("unexpected error: {other}"),
    }

    shutdown.trigger();
}
