//! Pinecone vector database client.
//!
//! Talks to Pinecone's REST surface directly: the control plane for index
//! host resolution, the `/embed` inference endpoint for integrated
//! embeddings, and the index data plane for upsert/query/delete/stats.
//! Every request carries a timeout and a bounded exponential-backoff
//! retry, since transient network failure is the dominant failure mode.

use crate::db::traits::{IndexStats, ScoredMatch, UpsertReceipt, VectorStore};
use crate::types::{AppError, Chunk, Result};
use crate::utils::config::{PineconeConfig, COLLABORATOR_ATTEMPTS};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Model used for integrated embeddings; must match the index config.
pub const EMBEDDING_MODEL: &str = "llama-text-embed-v2";

const API_VERSION: &str = "2025-01";
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Embedding input type. Pinecone embeds passages and queries differently.
#[derive(Debug, Clone, Copy)]
pub enum EmbedMode {
    Passage,
    Query,
}

impl EmbedMode {
    fn as_str(&self) -> &'static str {
        match self {
            EmbedMode::Passage => "passage",
            EmbedMode::Query => "query",
        }
    }
}

pub struct PineconeStore {
    http: reqwest::Client,
    api_key: String,
    /// Control-plane base URL; also hosts the inference endpoint.
    api_base: String,
    /// Data-plane base URL for the index.
    index_host: String,
}

impl PineconeStore {
    /// Connect to the configured index, resolving its data-plane host
    /// through the control plane unless one was configured directly.
    pub async fn connect(config: &PineconeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        let mut store = Self {
            http,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            index_host: String::new(),
        };

        store.index_host = match &config.index_host {
            Some(host) => normalize_host(host),
            None => store.resolve_index_host(&config.index_name).await?,
        };

        Ok(store)
    }

    async fn resolve_index_host(&self, index_name: &str) -> Result<String> {
        let url = format!("{}/indexes/{}", self.api_base, index_name);
        let body = self.send_with_retry(self.http.get(&url)).await?;

        let host = body
            .get("host")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::VectorStore(format!(
                    "Index '{}' description has no host field",
                    index_name
                ))
            })?;

        tracing::debug!(index = %index_name, host = %host, "resolved index host");
        Ok(normalize_host(host))
    }

    /// Generate embeddings through Pinecone's inference API.
    pub async fn embed(&self, texts: &[String], mode: EmbedMode) -> Result<Vec<Vec<f32>>> {
        let inputs: Vec<Value> = texts.iter().map(|t| json!({ "text": t })).collect();
        let payload = json!({
            "model": EMBEDDING_MODEL,
            "inputs": inputs,
            "parameters": { "input_type": mode.as_str() }
        });

        let url = format!("{}/embed", self.api_base);
        let body = self.send_with_retry(self.http.post(&url).json(&payload)).await?;

        let response: EmbedResponse = serde_json::from_value(body)
            .map_err(|e| AppError::VectorStore(format!("Malformed embed response: {}", e)))?;

        if response.data.len() != texts.len() {
            return Err(AppError::VectorStore(format!(
                "Embed returned {} vectors for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        Ok(response.data.into_iter().map(|e| e.values).collect())
    }

    /// Send a prepared request with bounded retries.
    ///
    /// Transport errors, 429 and 5xx are retried with exponential backoff;
    /// any other non-success status fails immediately.
    async fn send_with_retry(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let mut last_error = String::new();

        for attempt in 0..COLLABORATOR_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(RETRY_BASE_DELAY * 2u32.pow(attempt - 1)).await;
            }

            let request = request
                .try_clone()
                .ok_or_else(|| AppError::VectorStore("Request not cloneable".to_string()))?
                .header("Api-Key", &self.api_key)
                .header("X-Pinecone-API-Version", API_VERSION);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<Value>().await.map_err(|e| {
                            AppError::VectorStore(format!("Malformed response body: {}", e))
                        });
                    }

                    let detail = response.text().await.unwrap_or_default();
                    last_error = format!("HTTP {}: {}", status, detail);
                    let retryable = status.as_u16() == 429 || status.is_server_error();
                    if !retryable {
                        return Err(AppError::VectorStore(last_error));
                    }
                }
                Err(e) => {
                    last_error = e.to_string();
                }
            }

            tracing::warn!(
                attempt = attempt + 1,
                error = %last_error,
                "pinecone request failed, retrying"
            );
        }

        Err(AppError::VectorStore(format!(
            "Request failed after {} attempts: {}",
            COLLABORATOR_ATTEMPTS, last_error
        )))
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<UpsertReceipt> {
        if chunks.is_empty() {
            return Ok(UpsertReceipt { upserted: 0 });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embed(&texts, EmbedMode::Passage).await?;

        let vectors: Vec<Value> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, values)| {
                json!({
                    "id": chunk.id,
                    "values": values,
                    "metadata": {
                        "_text": chunk.text,
                        "chunk_index": chunk.metadata.chunk_index,
                        "source": chunk.metadata.source,
                    }
                })
            })
            .collect();

        let url = format!("{}/vectors/upsert", self.index_host);
        let payload = json!({ "vectors": vectors });
        let body = self.send_with_retry(self.http.post(&url).json(&payload)).await?;

        let response: UpsertResponse = serde_json::from_value(body)
            .map_err(|e| AppError::VectorStore(format!("Malformed upsert response: {}", e)))?;

        Ok(UpsertReceipt {
            upserted: response.upserted_count,
        })
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredMatch>> {
        let embeddings = self.embed(&[query.to_string()], EmbedMode::Query).await?;
        let vector = embeddings.into_iter().next().ok_or_else(|| {
            AppError::VectorStore("Embed returned no vector for query".to_string())
        })?;

        let url = format!("{}/query", self.index_host);
        let payload = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        let body = self.send_with_retry(self.http.post(&url).json(&payload)).await?;

        let response: QueryResponse = serde_json::from_value(body)
            .map_err(|e| AppError::VectorStore(format!("Malformed query response: {}", e)))?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| ScoredMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect())
    }

    async fn delete_all(&self) -> Result<()> {
        let url = format!("{}/vectors/delete", self.index_host);
        let payload = json!({ "deleteAll": true });
        self.send_with_retry(self.http.post(&url).json(&payload)).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let url = format!("{}/describe_index_stats", self.index_host);
        let body = self
            .send_with_retry(self.http.post(&url).json(&json!({})))
            .await?;

        let response: StatsResponse = serde_json::from_value(body)
            .map_err(|e| AppError::VectorStore(format!("Malformed stats response: {}", e)))?;

        Ok(IndexStats {
            total_vectors: response.total_vector_count,
            namespaces: response.namespaces.keys().cloned().collect(),
            dimension: response.dimension,
        })
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

// ============= Wire Types =============

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<Embedding>,
}

#[derive(Deserialize)]
struct Embedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: usize,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<MatchRecord>,
}

#[derive(Deserialize)]
struct MatchRecord {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(rename = "totalVectorCount", default)]
    total_vector_count: u64,
    #[serde(default)]
    namespaces: Map<String, Value>,
    dimension: Option<usize>,
}
