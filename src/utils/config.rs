use crate::rag::chunker::ChunkConfig;
use crate::types::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Number of attempts for every collaborator call (vector store, LLM).
pub const COLLABORATOR_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub pinecone: PineconeConfig,
    pub ollama: OllamaConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Single origin allowed by CORS.
    pub cors_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    /// Data-plane host for the index. When unset, resolved once at startup
    /// through the control plane.
    pub index_host: Option<String>,
    /// Control-plane base URL. Overridable for tests.
    pub api_base: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Directory scanned by the `ingest` subcommand.
    pub data_dir: String,
    pub chunking: ChunkConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("PINECONE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::Configuration(
                    "PINECONE_API_KEY is required. Add it to your .env file.".to_string(),
                )
            })?;

        let timeout_secs: u64 = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| {
                AppError::Configuration("REQUEST_TIMEOUT_SECS must be an integer".to_string())
            })?;
        let request_timeout = Duration::from_secs(timeout_secs);

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("PORT must be a valid port number".to_string())
                    })?,
                cors_origin: env::var("CORS_ORIGIN")
                    .unwrap_or_else(|_| "http://localhost:4200".to_string()),
            },
            pinecone: PineconeConfig {
                api_key,
                index_name: env::var("PINECONE_INDEX_NAME")
                    .unwrap_or_else(|_| "towering-fir".to_string()),
                index_host: env::var("PINECONE_INDEX_HOST").ok().filter(|h| !h.is_empty()),
                api_base: env::var("PINECONE_API_BASE")
                    .unwrap_or_else(|_| "https://api.pinecone.io".to_string()),
                request_timeout,
            },
            ollama: OllamaConfig {
                url: env::var("OLLAMA_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
                request_timeout,
            },
            ingest: IngestConfig {
                data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
                // Chunk geometry is fixed; it must match what the index was
                // populated with.
                chunking: ChunkConfig::default(),
            },
        })
    }
}
