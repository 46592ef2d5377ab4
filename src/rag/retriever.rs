//! Retrieval and context formatting.
//!
//! Ranking is entirely the vector store's: results come back in the
//! collaborator's similarity order and are not re-ranked here. The
//! formatted context string is the sole contract with the generator, so
//! its layout is significant.

use crate::db::VectorStore;
use crate::types::{RetrievedResult, Result};
use std::sync::Arc;

/// Metadata key the store uses to carry the chunk text alongside the
/// vector. Stripped from results before they leave the retriever.
pub const TEXT_METADATA_KEY: &str = "_text";

/// Returned when a query matches nothing in the index.
pub const NO_CONTEXT_SENTINEL: &str = "No relevant context found.";

const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

pub struct Retriever {
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Retrieve the `top_k` most relevant chunks for `query`, in the
    /// store's descending-relevance order.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedResult>> {
        let matches = self.store.search(query, top_k).await?;

        let results = matches
            .into_iter()
            .map(|m| {
                let mut metadata = m.metadata;
                let text = metadata
                    .remove(TEXT_METADATA_KEY)
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                RetrievedResult {
                    id: m.id,
                    score: m.score,
                    text,
                    metadata,
                }
            })
            .collect();

        Ok(results)
    }

    /// Retrieve and render chunks as the literal context string handed to
    /// the generator.
    pub async fn retrieve_as_context(&self, query: &str, top_k: usize) -> Result<String> {
        let results = self.retrieve(query, top_k).await?;
        tracing::debug!(query = %query, results = results.len(), "retrieved context");
        Ok(format_context(&results))
    }
}

/// Render results as numbered blocks with provenance and score, or the
/// fixed sentinel when there are none.
pub fn format_context(results: &[RetrievedResult]) -> String {
    if results.is_empty() {
        return NO_CONTEXT_SENTINEL.to_string();
    }

    let blocks: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!(
                "[{}] (Source: {}, Score: {:.3})\n{}",
                i + 1,
                result.source(),
                result.score,
                result.text
            )
        })
        .collect();

    blocks.join(CONTEXT_SEPARATOR)
}
