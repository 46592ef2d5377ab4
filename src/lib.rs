//! # Docket
//!
//! A retrieval-augmented company-policy assistant. Documents are chunked
//! and stored as embeddings in a hosted Pinecone index; at question time
//! the top-matching chunks are retrieved and handed, together with the
//! question and a trailing history window, to a locally-hosted Ollama
//! model.
//!
//! Docket can be used in two ways:
//!
//! 1. **As a standalone server/CLI** - run the `docket` binary
//! 2. **As a library** - import the pipeline into your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use docket::db::PineconeStore;
//! use docket::rag::Retriever;
//! use docket::utils::config::Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> docket::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(PineconeStore::connect(&config.pinecone).await?);
//!     let retriever = Retriever::new(store);
//!     let context = retriever.retrieve_as_context("password policy", 3).await?;
//!     println!("{}", context);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`rag`] - chunking, ingestion, retrieval and answer generation
//! - [`db`] - vector store trait and the Pinecone REST client
//! - [`llm`] - LLM client trait and the Ollama implementation
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - command-line interface
//! - [`types`] - common types and error handling

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// Vector store clients.
pub mod db;
/// LLM provider clients.
pub mod llm;
/// RAG pipeline components.
pub mod rag;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use db::{PineconeStore, VectorStore};
pub use llm::{LLMClient, OllamaClient};
pub use rag::{IngestPipeline, ResponseGenerator, Retriever};
pub use types::{AppError, Result};
pub use utils::config::Config;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Environment-sourced configuration
    pub config: Arc<Config>,
    /// Retrieval pipeline over the vector store
    pub retriever: Arc<Retriever>,
    /// Prompt assembly and generation
    pub generator: Arc<ResponseGenerator>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            config,
            retriever: Arc::new(Retriever::new(store)),
            generator: Arc::new(ResponseGenerator::new(llm)),
        }
    }
}
