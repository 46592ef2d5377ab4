use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use crate::utils::config::COLLABORATOR_ATTEMPTS;
use async_trait::async_trait;
use ollama_rs::{generation::completion::request::GenerationRequest, Ollama};
use std::time::Duration;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

pub struct OllamaClient {
    client: Ollama,
    model: String,
    /// Hard cap on a single generate call; Ollama has no server-side
    /// deadline of its own.
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: String, timeout: Duration) -> Self {
        let (host, port) = parse_host_port(base_url);
        let client = Ollama::new(host, port);
        Self {
            client,
            model,
            timeout,
        }
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut last_error = String::new();

        for attempt in 0..COLLABORATOR_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(RETRY_BASE_DELAY * 2u32.pow(attempt - 1)).await;
            }

            let request = GenerationRequest::new(self.model.clone(), prompt.to_string());
            let call = self.client.generate(request);

            match tokio::time::timeout(self.timeout, call).await {
                Ok(Ok(response)) => return Ok(response.response),
                Ok(Err(e)) => last_error = format!("Ollama error: {}", e),
                Err(_) => {
                    last_error = format!("Ollama timed out after {:?}", self.timeout);
                }
            }

            tracing::warn!(
                attempt = attempt + 1,
                model = %self.model,
                error = %last_error,
                "generation failed, retrying"
            );
        }

        Err(AppError::Generation(format!(
            "Generation failed after {} attempts: {}",
            COLLABORATOR_ATTEMPTS, last_error
        )))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn parse_host_port(base_url: &str) -> (String, u16) {
    let url_parts: Vec<&str> = base_url.split("://").collect();
    if url_parts.len() == 2 {
        let scheme = url_parts[0];
        let host_port: Vec<&str> = url_parts[1].trim_end_matches('/').split(':').collect();
        let host = format!("{}://{}", scheme, host_port[0]);
        let port = if host_port.len() == 2 {
            host_port[1].parse().unwrap_or(11434)
        } else {
            11434
        };
        (host, port)
    } else {
        ("http://localhost".to_string(), 11434)
    }
}
