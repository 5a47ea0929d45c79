use super::*;
use crate::config::Config;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.pinecone.index_host = Url::parse(server_uri).expect("Mock server URI is valid");
    config.secrets.pinecone_api_key = Some("pc-test".to_string());
    config
}

#[test]
fn singleton_part_ids_are_deterministic() {
    assert_eq!(singleton_part_id(ROSTER_RECORD_ID, 0), "all-users");
    assert_eq!(singleton_part_id(ROSTER_RECORD_ID, 1), "all-users2");
    assert_eq!(singleton_part_id(CHAT_RECORD_ID, 0), "chat-record");
    assert_eq!(singleton_part_id(CHAT_RECORD_ID, 1), "chat-record2");
}

#[tokio::test]
async fn upsert_posts_records_with_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(header("Api-Key", "pc-test"))
        .and(body_partial_json(json!({
            "vectors": [{
                "id": "doc-1",
                "values": [0.1, 0.2],
                "metadata": {"subject": "handbook.pdf", "context": "PTO policy"}
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upsertedCount": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = VectorStoreClient::new(&test_config(&server.uri()));
    let record = VectorRecord {
        id: "doc-1".to_string(),
        values: vec![0.1, 0.2],
        metadata: VectorMetadata {
            subject: "handbook.pdf".to_string(),
            context: "PTO policy".to_string(),
        },
    };

    client.upsert(&[record]).await.expect("Upsert failed");
}

#[tokio::test]
async fn upsert_rejects_empty_embedding_locally() {
    let server = MockServer::start().await;

    let client = VectorStoreClient::new(&test_config(&server.uri()));
    let record = VectorRecord {
        id: "doc-1".to_string(),
        values: Vec::new(),
        metadata: VectorMetadata {
            subject: "handbook.pdf".to_string(),
            context: "PTO policy".to_string(),
        },
    };

    let error = client.upsert(&[record]).await.expect_err("Expected failure");
    assert!(error.to_string().contains("empty embedding vector"));
    assert!(server.received_requests().await.expect("Requests").is_empty());
}

#[tokio::test]
async fn upsert_of_nothing_is_a_no_op() {
    let server = MockServer::start().await;

    let client = VectorStoreClient::new(&test_config(&server.uri()));
    client.upsert(&[]).await.expect("Upsert failed");

    assert!(server.received_requests().await.expect("Requests").is_empty());
}

#[tokio::test]
async fn update_rewrites_metadata_in_place() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vectors/update"))
        .and(body_partial_json(json!({
            "id": "all-users",
            "setMetadata": {"subject": "EmployeeData", "context": "{\"users\":[]}"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = VectorStoreClient::new(&test_config(&server.uri()));
    let metadata = VectorMetadata {
        subject: "EmployeeData".to_string(),
        context: "{\"users\":[]}".to_string(),
    };

    client
        .update_metadata(ROSTER_RECORD_ID, &metadata)
        .await
        .expect("Update failed");
}

#[tokio::test]
async fn query_returns_coerced_matches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({"topK": 1, "includeMetadata": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{
                "id": "doc-42",
                "score": 0.87,
                "metadata": {"subject": "handbook.pdf", "context": "PTO policy"}
            }]
        })))
        .mount(&server)
        .await;

    let client = VectorStoreClient::new(&test_config(&server.uri()));
    let matches = client.query(&[0.1, 0.2], 1).await.expect("Query failed");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "doc-42");
    assert_eq!(matches[0].metadata.subject, "handbook.pdf");
    assert_eq!(matches[0].metadata.context, "PTO policy");
}

#[tokio::test]
async fn absent_metadata_falls_back_to_placeholders() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{"id": "doc-7", "score": 0.5}]
        })))
        .mount(&server)
        .await;

    let client = VectorStoreClient::new(&test_config(&server.uri()));
    let matches = client.query(&[0.1], 1).await.expect("Query failed");

    assert_eq!(matches[0].metadata.subject, "Unknown");
    assert_eq!(matches[0].metadata.context, "No context available");
}

#[tokio::test]
async fn empty_index_yields_empty_match_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": []})))
        .mount(&server)
        .await;

    let client = VectorStoreClient::new(&test_config(&server.uri()));
    let matches = client.query(&[0.1], 1).await.expect("Query failed");

    assert!(matches.is_empty());
}

#[tokio::test]
async fn empty_query_vector_is_rejected_locally() {
    let server = MockServer::start().await;

    let client = VectorStoreClient::new(&test_config(&server.uri()));
    let error = client.query(&[], 1).await.expect_err("Expected failure");

    assert!(error.to_string().contains("empty embedding vector"));
    assert!(server.received_requests().await.expect("Requests").is_empty());
}
