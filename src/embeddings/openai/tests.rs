use super::*;
use crate::config::Config;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.openai.api_base = Url::parse(server_uri).expect("Mock server URI is valid");
    config.secrets.openai_api_key = Some("sk-test".to_string());
    config
}

#[test]
fn averaging_preserves_dimension_and_takes_element_mean() {
    let averaged = average(&[vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 5.0]]);
    assert_eq!(averaged, vec![2.0, 3.0, 4.0]);

    let single = average(&[vec![0.5, -0.5]]);
    assert_eq!(single, vec![0.5, -0.5]);
}

#[test]
fn averaging_nothing_yields_empty_vector() {
    assert!(average(&[]).is_empty());
}

#[tokio::test]
async fn embeds_short_text_with_single_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.1, 0.2, 0.3]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EmbeddingClient::new(&test_config(&server.uri()));
    let embedding = client.embed("what is our vacation policy").await;

    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn oversized_text_is_embedded_per_chunk_and_averaged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_partial_json(json!({"input": "aaaaaaa bbbbbbb"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [1.0, 2.0]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_partial_json(json!({"input": "ccccccc ddddddd"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [3.0, 4.0]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Budget of 4 estimated tokens after the margin: two words per chunk
    let client = EmbeddingClient::new(&test_config(&server.uri()))
        .with_token_limit(TOKEN_BUDGET_MARGIN + 4);
    let embedding = client.embed("aaaaaaa bbbbbbb ccccccc ddddddd").await;

    assert_eq!(embedding, vec![2.0, 3.0]);
}

#[tokio::test]
async fn provider_failure_collapses_to_empty_vector() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = EmbeddingClient::new(&test_config(&server.uri()));
    let embedding = client.embed("anything").await;

    assert!(embedding.is_empty());
}

#[tokio::test]
async fn malformed_response_collapses_to_empty_vector() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let client = EmbeddingClient::new(&test_config(&server.uri()));
    let embedding = client.embed("anything").await;

    assert!(embedding.is_empty());
}

#[test]
fn builder_overrides_apply() {
    let client = EmbeddingClient::new(&Config::default())
        .with_model("text-embedding-3-small".to_string())
        .with_token_limit(2048);

    assert_eq!(client.model, "text-embedding-3-small");
    assert_eq!(client.token_limit, 2048);
}
