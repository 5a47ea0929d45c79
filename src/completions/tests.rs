use super::*;
use crate::config::Config;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.openai.api_base = Url::parse(server_uri).expect("Mock server URI is valid");
    config.secrets.openai_api_key = Some("sk-test".to_string());
    config
}

#[tokio::test]
async fn returns_first_choice_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": "hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Hi there!"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::new(&test_config(&server.uri()));
    let reply = client.complete("hello").await.expect("Completion failed");

    assert_eq!(reply, "Hi there!");
}

#[tokio::test]
async fn sampling_caps_are_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "max_tokens": 150,
            "temperature": 0.7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "capped"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::new(&test_config(&server.uri())).with_sampling(150, 0.7);
    let reply = client.complete("prompt").await.expect("Completion failed");

    assert_eq!(reply, "capped");
}

#[tokio::test]
async fn provider_error_status_surfaces_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = CompletionClient::new(&test_config(&server.uri()));
    let error = client.complete("hello").await.expect_err("Expected failure");

    assert!(error.to_string().contains("error status"));
}

#[tokio::test]
async fn empty_choice_list_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = CompletionClient::new(&test_config(&server.uri()));
    let error = client.complete("hello").await.expect_err("Expected failure");

    assert!(error.to_string().contains("no choices"));
}
