//! LLM client abstraction.

use crate::types::Result;
use async_trait::async_trait;

/// Generic LLM client trait.
///
/// The pipeline needs exactly one operation: a synchronous, non-streaming
/// completion of a fully assembled prompt. Keeping it behind a trait lets
/// tests substitute a scripted client.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}
