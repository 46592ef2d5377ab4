//! Pinecone REST client tests against a wiremock server.

use docket::db::{PineconeStore, VectorStore};
use docket::utils::config::PineconeConfig;
use docket::types::{Chunk, ChunkMetadata};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> PineconeConfig {
    PineconeConfig {
        api_key: "test-key".to_string(),
        index_name: "test-index".to_string(),
        index_host: Some(server.uri()),
        api_base: server.uri(),
        request_timeout: Duration::from_secs(5),
    }
}

fn chunk(id: &str, text: &str, index: usize) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        metadata: ChunkMetadata {
            chunk_index: index,
            source: "handbook.md".to_string(),
        },
    }
}

fn embed_response(count: usize) -> ResponseTemplate {
    let data: Vec<_> = (0..count)
        .map(|_| json!({ "values": [0.1, 0.2, 0.3] }))
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

#[tokio::test]
async fn test_upsert_embeds_passages_then_upserts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(header("Api-Key", "test-key"))
        .and(body_partial_json(json!({
            "model": "llama-text-embed-v2",
            "parameters": { "input_type": "passage" }
        })))
        .respond_with(embed_response(2))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(body_partial_json(json!({
            "vectors": [
                { "id": "c1", "metadata": { "_text": "first", "source": "handbook.md" } },
                { "id": "c2", "metadata": { "_text": "second", "chunk_index": 1 } }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "upsertedCount": 2 })))
        .expect(1)
        .mount(&server)
        .await;

    let store = PineconeStore::connect(&config_for(&server)).await.unwrap();
    let receipt = store
        .upsert(&[chunk("c1", "first", 0), chunk("c2", "second", 1)])
        .await
        .unwrap();

    assert_eq!(receipt.upserted, 2);
}

#[tokio::test]
async fn test_search_embeds_query_and_returns_ranked_matches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(body_partial_json(json!({
            "parameters": { "input_type": "query" }
        })))
        .respond_with(embed_response(1))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({ "topK": 3, "includeMetadata": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                { "id": "a", "score": 0.92, "metadata": { "_text": "PTO text", "source": "h.md" } },
                { "id": "b", "score": 0.41 }
            ]
        })))
        .mount(&server)
        .await;

    let store = PineconeStore::connect(&config_for(&server)).await.unwrap();
    let matches = store.search("how much pto", 3).await.unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, "a");
    assert!((matches[0].score - 0.92).abs() < 1e-6);
    assert_eq!(matches[0].metadata["_text"], "PTO text");
    assert!(matches[1].metadata.is_empty());
}

#[tokio::test]
async fn test_resolves_index_host_through_control_plane() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes/test-index"))
        .and(header("Api-Key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "host": server.uri() })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalVectorCount": 42,
            "namespaces": { "": {} },
            "dimension": 1024
        })))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.index_host = None;

    let store = PineconeStore::connect(&config).await.unwrap();
    let stats = store.stats().await.unwrap();

    assert_eq!(stats.total_vectors, 42);
    assert_eq!(stats.dimension, Some(1024));
    assert_eq!(stats.namespaces, vec!["".to_string()]);
}

#[tokio::test]
async fn test_retries_on_server_errors() {
    let server = MockServer::start().await;

    // First two attempts fail, the third succeeds.
    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalVectorCount": 7,
            "namespaces": {}
        })))
        .mount(&server)
        .await;

    let store = PineconeStore::connect(&config_for(&server)).await.unwrap();
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_vectors, 7);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vectors/delete"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let store = PineconeStore::connect(&config_for(&server)).await.unwrap();
    let err = store.delete_all().await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_delete_all_sends_delete_all_flag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vectors/delete"))
        .and(body_partial_json(json!({ "deleteAll": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = PineconeStore::connect(&config_for(&server)).await.unwrap();
    store.delete_all().await.unwrap();
}
