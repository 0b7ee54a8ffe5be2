use std::time::Duration;

use serde_json::json;
use shortlist_core::Transient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shortlist_pinecone::client::PineconeHttpClient;
use shortlist_pinecone::PineconeIndexError;

fn client(server: &MockServer) -> PineconeHttpClient {
    PineconeHttpClient::new(server.uri(), "test-key".to_string(), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn upsert_sends_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(header("Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let payload = json!({"vectors": [], "namespace": "prod"});
    client(&server)
        .post_json("/vectors/upsert", &payload)
        .await
        .unwrap();
}

#[tokio::test]
async fn maps_api_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "7")
                .set_body_json(json!({"message": "rate limit"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .post_json("/query", &json!({}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("429"));
    assert!(err.is_transient());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({"matches": []})),
        )
        .mount(&server)
        .await;

    let client =
        PineconeHttpClient::new(server.uri(), "k".to_string(), Duration::from_millis(50)).unwrap();
    let err = client.post_json("/query", &json!({})).await.unwrap_err();
    assert!(matches!(err, PineconeIndexError::Timeout(_)));
}

#[test]
fn rejects_blank_api_key_and_bad_url() {
    let err = PineconeHttpClient::new(
        "https://example.test".to_string(),
        "  ".to_string(),
        Duration::from_secs(1),
    )
    .unwrap_err();
    assert!(matches!(err, PineconeIndexError::Config(_)));

    let err = PineconeHttpClient::new(
        "not a url".to_string(),
        "key".to_string(),
        Duration::from_secs(1),
    )
    .unwrap_err();
    assert!(err.to_string().contains("invalid base_url"));
}
