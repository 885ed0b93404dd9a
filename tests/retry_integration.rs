mod common;

use std::collections::HashSet;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{RecordingSleeper, build_client_with, request_count, retry_config};
use kalshi_api_client::KalshiError;
use kalshi_api_client::auth::ACCESS_TIMESTAMP_HEADER;
use kalshi_api_client::rest::{CreateOrderRequest, KalshiRestClient, LimitPrice};
use kalshi_api_client::types::Action;

const BALANCE_PATH: &str = "/trade-api/v2/portfolio/balance";

fn balance_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "balance": 500 }))
}

async fn mount_failures(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(times)
        .with_priority(1)
        .mount(server)
        .await;
}

async fn mount_success(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .respond_with(balance_ok())
        .with_priority(2)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_rate_limited_twice_then_success() {
    let server = MockServer::start().await;
    mount_failures(&server, 429, 2).await;
    mount_success(&server).await;

    let sleeper = RecordingSleeper::default();
    let client = build_client_with(&server, retry_config(5), sleeper.clone());
    let balance = client.get_balance().await.unwrap();

    assert_eq!(balance.balance, 500);
    assert_eq!(request_count(&server).await, 3);
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[tokio::test]
async fn test_persistent_rate_limit_exhausts_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(4)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let client = build_client_with(&server, retry_config(4), sleeper.clone());
    let err = client.get_balance().await.unwrap_err();

    match err {
        KalshiError::ExhaustedRetries {
            last_status,
            attempts,
        } => {
            assert_eq!(last_status, Some(429));
            assert_eq!(attempts, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // No sleep after the final attempt.
    assert_eq!(sleeper.delays().len(), 3);
}

#[tokio::test]
async fn test_retry_after_overrides_backoff() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1.5"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_success(&server).await;

    let sleeper = RecordingSleeper::default();
    let client = build_client_with(&server, retry_config(3), sleeper.clone());
    client.get_balance().await.unwrap();

    assert_eq!(sleeper.delays(), vec![Duration::from_millis(1500)]);
}

#[tokio::test]
async fn test_retry_after_is_capped_at_max_delay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "86400"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_success(&server).await;

    let sleeper = RecordingSleeper::default();
    let client = build_client_with(&server, retry_config(3), sleeper.clone());
    client.get_balance().await.unwrap();

    // retry_config caps delays at 5s.
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(5)]);
}

#[tokio::test]
async fn test_unrepresentable_retry_after_falls_back_to_backoff() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1e30"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_success(&server).await;

    let sleeper = RecordingSleeper::default();
    let client = build_client_with(&server, retry_config(3), sleeper.clone());
    let balance = client.get_balance().await.unwrap();

    assert_eq!(balance.balance, 500);
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(100)]);
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    mount_failures(&server, 503, 1).await;
    mount_success(&server).await;

    let sleeper = RecordingSleeper::default();
    let client = build_client_with(&server, retry_config(3), sleeper.clone());
    let balance = client.get_balance().await.unwrap();

    assert_eq!(balance.balance, 500);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_request_timeout_status_is_retried() {
    let server = MockServer::start().await;
    mount_failures(&server, 408, 1).await;
    mount_success(&server).await;

    let client = build_client_with(&server, retry_config(2), RecordingSleeper::default());
    assert!(client.get_balance().await.is_ok());
}

#[tokio::test]
async fn test_bad_request_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let client = build_client_with(&server, retry_config(5), sleeper.clone());
    let err = client.get_balance().await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_every_attempt_is_signed_afresh() {
    let server = MockServer::start().await;
    mount_failures(&server, 500, 2).await;
    mount_success(&server).await;

    let client = build_client_with(&server, retry_config(3), RecordingSleeper::default());
    client.get_balance().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let timestamps: HashSet<String> = requests
        .iter()
        .filter_map(|r| r.headers.get(ACCESS_TIMESTAMP_HEADER))
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect();
    assert_eq!(requests.len(), 3);
    assert_eq!(timestamps.len(), 3);
}

#[tokio::test]
async fn test_connection_failures_exhaust_without_status() {
    let sleeper = RecordingSleeper::default();
    let client = KalshiRestClient::builder(common::credentials())
        // Nothing listens on port 1.
        .base_url("http://127.0.0.1:1")
        .retry_config(retry_config(2))
        .rate_limit(common::no_pacing())
        .sleeper(std::sync::Arc::new(sleeper.clone()))
        .build()
        .unwrap();

    let err = client.get_balance().await.unwrap_err();

    match err {
        KalshiError::ExhaustedRetries {
            last_status,
            attempts,
        } => {
            assert_eq!(last_status, None);
            assert_eq!(attempts, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(sleeper.delays().len(), 1);
}

#[tokio::test]
async fn test_transport_failure_keeps_earlier_http_status() {
    let server = MockServer::start().await;
    mount_failures(&server, 503, 1).await;

    // Second attempt outlives the client timeout.
    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .respond_with(balance_ok().set_delay(Duration::from_secs(2)))
        .with_priority(2)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let client = KalshiRestClient::builder(common::credentials())
        .base_url(server.uri())
        .timeout(Duration::from_millis(200))
        .retry_config(retry_config(2))
        .rate_limit(common::no_pacing())
        .sleeper(std::sync::Arc::new(sleeper.clone()))
        .build()
        .unwrap();

    let err = client.get_balance().await.unwrap_err();

    match err {
        KalshiError::ExhaustedRetries {
            last_status,
            attempts,
        } => {
            assert_eq!(last_status, Some(503));
            assert_eq!(attempts, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_retried_order_reuses_client_order_id() {
    let server = MockServer::start().await;
    let orders_path = "/trade-api/v2/portfolio/orders";

    Mock::given(method("POST"))
        .and(path(orders_path))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(orders_path))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "order": {
                "order_id": "ord-9",
                "ticker": "KXBTC-A",
                "side": "yes",
                "action": "buy",
                "status": "resting"
            }
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let client = build_client_with(&server, retry_config(3), RecordingSleeper::default());
    let request = CreateOrderRequest::limit("KXBTC-A", Action::Buy, LimitPrice::Yes(40), 1);
    let order = client.place_order(&request).await.unwrap();
    assert_eq!(order.order_id, "ord-9");

    let ids: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["client_order_id"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids[0].is_empty());
    assert_eq!(ids[0], ids[1]);
}
