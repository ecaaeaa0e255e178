//! Integration tests for `OllamaClient` using wiremock HTTP mocks.

use std::time::Duration;

use flashwire_llm::{LlmError, OllamaClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OllamaClient {
    OllamaClient::new(base_url, "test-model").expect("client construction should not fail")
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn generate_returns_trimmed_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "prompt": "Classify this",
            "system": "You are an analyst",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "test-model",
            "response": "  fact\n",
            "done": true
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let completion = client
        .generate("Classify this", Some("You are an analyst"), TIMEOUT)
        .await
        .expect("should return completion");

    assert_eq!(completion, "fact");
}

#[tokio::test]
async fn generate_omits_system_field_when_not_set() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let completion = client.generate("hello", None, TIMEOUT).await.unwrap();
    assert_eq!(completion, "ok");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("system").is_none());
}

#[tokio::test]
async fn non_success_status_is_a_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.generate("hello", None, TIMEOUT).await.unwrap_err();

    assert!(matches!(
        err,
        LlmError::UnexpectedStatus { status: 503, .. }
    ));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.generate("hello", None, TIMEOUT).await.unwrap_err();

    assert!(matches!(err, LlmError::Deserialize { .. }));
}

#[tokio::test]
async fn slow_endpoint_times_out_as_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "response": "late" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .generate("hello", None, Duration::from_millis(100))
        .await
        .unwrap_err();

    match err {
        LlmError::Http(e) => assert!(e.is_timeout(), "expected timeout, got: {e}"),
        other => panic!("expected Http timeout error, got: {other}"),
    }
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_normalised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok"
        })))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}///", server.uri()));
    let completion = client.generate("hello", None, TIMEOUT).await.unwrap();
    assert_eq!(completion, "ok");
}
