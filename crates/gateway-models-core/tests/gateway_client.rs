//! Gateway client tests against a wiremock server.

use std::time::Duration;

use gateway_models_core::api::GatewayClient;
use gateway_models_core::config::Config;
use gateway_models_core::error::CatalogError;
use gateway_models_core::session::{Session, ViewState};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for_server(server: &MockServer, revalidate: Duration) -> GatewayClient {
    GatewayClient::new(format!("{}/api/gateway/models", server.uri()), revalidate)
        .expect("client creation should succeed")
}

fn two_models() -> serde_json::Value {
    json!({
        "data": [
            {"id": "openai/gpt-4", "name": "GPT-4", "pricing": {"prompt": "0.00003", "completion": "0.00006"}},
            {"id": "meta/llama-3", "name": "Llama 3", "pricing": {"prompt": "0", "completion": "0"}}
        ]
    })
}

#[tokio::test]
async fn fetch_returns_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gateway/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_models()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::ZERO);
    let models = client.fetch_catalog().await.expect("fetch should succeed");
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "openai/gpt-4");
}

#[tokio::test]
async fn missing_or_null_data_is_empty() {
    for body in [json!({}), json!({"data": null})] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = client_for_server(&server, Duration::ZERO);
        let models = client.fetch_catalog().await.expect("fetch should succeed");
        assert!(models.is_empty());
    }
}

#[tokio::test]
async fn non_success_status_carries_code_and_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::ZERO);
    let err = client.fetch_catalog().await.unwrap_err();
    match &err {
        CatalogError::Status { status, status_text } => {
            assert_eq!(*status, 503);
            assert_eq!(status_text, "Service Unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn malformed_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::ZERO);
    let err = client.fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::Json(_)), "got {err:?}");
}

#[tokio::test]
async fn transport_failure_is_http_error() {
    // Nothing listens on the discard port.
    let client = GatewayClient::new("http://127.0.0.1:9/models", Duration::ZERO).unwrap();
    let err = client.fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn initial_load_degrades_silently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::from_secs(60));
    assert!(client.initial_load().await.is_none());
}

#[tokio::test]
async fn initial_load_reuses_result_inside_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_models()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::from_secs(60));
    let first = client.initial_load().await.expect("first load");
    let second = client.initial_load().await.expect("second load");
    assert_eq!(first.len(), second.len());
    // Mock expectation (exactly one request) is verified on drop.
}

#[tokio::test]
async fn reload_bypasses_revalidation_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_models()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::from_secs(60));
    client.initial_load().await.expect("initial load");
    let mut session = Session::default();
    client.reload(&mut session).await;
    assert_eq!(session.catalog().models.len(), 2);
}

#[tokio::test]
async fn reload_error_then_retry_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_models()))
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::ZERO);
    let mut session = Session::default();

    client.reload(&mut session).await;
    match session.view_state() {
        ViewState::Error { message } => assert!(message.contains("502"), "message: {message}"),
        other => panic!("expected error, got {other:?}"),
    }

    client.reload(&mut session).await;
    assert!(session.catalog().error.is_none());
    assert!(!session.catalog().loading);
    match session.view_state() {
        ViewState::Models { models } => assert_eq!(models.len(), 2),
        other => panic!("expected models, got {other:?}"),
    }
}

#[tokio::test]
async fn open_falls_back_to_reload_and_surfaces_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::from_secs(60));
    let mut session = Session::default();
    client.open(&mut session).await;
    assert_eq!(session.catalog().error.as_deref(), Some("HTTP 404: Not Found"));
}

#[tokio::test]
async fn nonstandard_status_has_no_empty_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(599))
        .mount(&server)
        .await;

    let client = client_for_server(&server, Duration::ZERO);
    let err = client.fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 599, .. }));
    assert_eq!(err.to_string(), "HTTP 599");
}

fn config_for_server(server: &MockServer, revalidate_secs: u64) -> Config {
    Config {
        endpoint: format!("{}/api/gateway/models", server.uri()),
        revalidate_secs,
        ..Config::default()
    }
}

#[tokio::test]
async fn configured_window_reuses_initial_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_models()))
        .expect(1)
        .mount(&server)
        .await;

    let client = GatewayClient::from_config(&config_for_server(&server, 60)).unwrap();
    client.initial_load().await.expect("first load");
    client.initial_load().await.expect("second load");
}

#[tokio::test]
async fn zero_window_refetches_every_initial_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_models()))
        .expect(2)
        .mount(&server)
        .await;

    let client = GatewayClient::from_config(&config_for_server(&server, 0)).unwrap();
    client.initial_load().await.expect("first load");
    client.initial_load().await.expect("second load");
}
