//! Vector store abstraction.
//!
//! The `VectorStore` trait is the seam between the pipeline and the hosted
//! vector database. Embedding and nearest-neighbor search both live behind
//! it: callers hand over raw text and get back ranked matches, which keeps
//! the HTTP and CLI layers mockable in tests.

use crate::types::{Chunk, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A ranked match from the store, metadata still carrying the internal
/// text key.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub id: String,
    /// Similarity under the store's distance metric; higher is more
    /// relevant.
    pub score: f32,
    pub metadata: Map<String, Value>,
}

/// Acknowledgment returned by an upsert.
#[derive(Debug, Clone, Copy)]
pub struct UpsertReceipt {
    pub upserted: usize,
}

/// Index-level statistics.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub total_vectors: u64,
    pub namespaces: Vec<String>,
    pub dimension: Option<usize>,
}

/// Abstract trait for vector store operations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed chunk texts and store the vectors with their metadata.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<UpsertReceipt>;

    /// Embed `query` and return the `top_k` nearest chunks, pre-sorted by
    /// the store's similarity ranking (descending relevance).
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredMatch>>;

    /// Delete every stored vector. Destructive.
    async fn delete_all(&self) -> Result<()>;

    /// Vector count and namespace listing.
    async fn stats(&self) -> Result<IndexStats>;
}
