//! Mock implementations shared across test files.

#![allow(dead_code)]

use async_trait::async_trait;
use docket::db::{IndexStats, ScoredMatch, UpsertReceipt, VectorStore};
use docket::llm::LLMClient;
use docket::types::{AppError, Chunk, Result};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Mock vector store with scripted matches and recorded upserts.
pub struct MockVectorStore {
    matches: Vec<ScoredMatch>,
    should_fail: bool,
    pub upserted: Mutex<Vec<Chunk>>,
    pub cleared: Mutex<bool>,
}

impl MockVectorStore {
    pub fn with_matches(matches: Vec<ScoredMatch>) -> Self {
        Self {
            matches,
            should_fail: false,
            upserted: Mutex::new(Vec::new()),
            cleared: Mutex::new(false),
        }
    }

    pub fn empty() -> Self {
        Self::with_matches(Vec::new())
    }

    pub fn failing() -> Self {
        Self {
            matches: Vec::new(),
            should_fail: true,
            upserted: Mutex::new(Vec::new()),
            cleared: Mutex::new(false),
        }
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<UpsertReceipt> {
        if self.should_fail {
            return Err(AppError::VectorStore("Mock store failure".to_string()));
        }
        self.upserted.lock().unwrap().extend_from_slice(chunks);
        Ok(UpsertReceipt {
            upserted: chunks.len(),
        })
    }

    async fn search(&self, _query: &str, top_k: usize) -> Result<Vec<ScoredMatch>> {
        if self.should_fail {
            return Err(AppError::VectorStore("Mock store failure".to_string()));
        }
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }

    async fn delete_all(&self) -> Result<()> {
        if self.should_fail {
            return Err(AppError::VectorStore("Mock store failure".to_string()));
        }
        *self.cleared.lock().unwrap() = true;
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats> {
        if self.should_fail {
            return Err(AppError::VectorStore("Mock store failure".to_string()));
        }
        Ok(IndexStats {
            total_vectors: self.matches.len() as u64,
            namespaces: vec!["default".to_string()],
            dimension: Some(1024),
        })
    }
}

/// Mock LLM client returning a fixed response and capturing prompts.
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl MockLLMClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: String::new(),
            should_fail: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.should_fail {
            return Err(AppError::Generation("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// A scored match carrying the internal `_text` key plus a source.
pub fn scored_match(id: &str, score: f32, text: &str, source: &str) -> ScoredMatch {
    let mut metadata = Map::new();
    metadata.insert("_text".to_string(), Value::String(text.to_string()));
    metadata.insert("source".to_string(), Value::String(source.to_string()));
    metadata.insert("chunk_index".to_string(), Value::from(0));
    ScoredMatch {
        id: id.to_string(),
        score,
        metadata,
    }
}
