//! LLM provider clients.

pub mod client;
pub mod ollama;

pub use client::LLMClient;
pub use ollama::OllamaClient;
