//! Answer generation.
//!
//! Merges the retrieved context, a trailing window of conversation turns
//! and the user query into one prompt, then makes a single non-streaming
//! call to the generation service.

use crate::llm::LLMClient;
use crate::types::{ConversationTurn, Result};
use std::sync::Arc;

/// Maximum number of trailing conversation turns rendered into the prompt.
pub const HISTORY_WINDOW: usize = 6;

const SYSTEM_INSTRUCTION: &str = r#"You are a company policy assistant that ONLY answers questions about the Acme Corporation Employee Handbook and IT Security Policy.

Rules:
- Only answer questions related to the provided context about company policies
- Keep responses concise and direct
- Always try to apply what the user is asking to the company policies documents
- If the user asks about ANYTHING else (casual chat, general questions, off-topic requests), respond with:
  "I can only answer questions about the Acme Corporation Employee Handbook and IT Security Policy. Here are some things you can ask me:
  - How much PTO do I get?
  - What are the password requirements?
  - Can I work from home?
  - What's the dress code?
  - How do I report a security incident?""#;

pub struct ResponseGenerator {
    llm: Arc<dyn LLMClient>,
}

impl ResponseGenerator {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Generate an answer for `query` given the formatted context string
    /// and the caller-supplied history.
    pub async fn generate(
        &self,
        query: &str,
        context: &str,
        history: &[ConversationTurn],
    ) -> Result<String> {
        let prompt = build_prompt(query, context, &render_history(history));

        tracing::debug!(
            model = %self.llm.model_name(),
            prompt_chars = prompt.chars().count(),
            "generating answer"
        );

        let answer = self.llm.generate(&prompt).await?;
        Ok(answer.trim().to_string())
    }
}

/// Render at most the last [`HISTORY_WINDOW`] turns, in original order,
/// one `"<Role>: <content>"` line per turn.
pub fn render_history(turns: &[ConversationTurn]) -> String {
    let start = turns.len().saturating_sub(HISTORY_WINDOW);
    turns[start..]
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_prompt(query: &str, context: &str, history: &str) -> String {
    let history_block = if history.is_empty() {
        String::new()
    } else {
        format!("Conversation History:\n{}\n\n", history)
    };

    format!(
        "{system}\n\nContext:\n{context}\n\n{history_block}User: {query}\n\nResponse:",
        system = SYSTEM_INSTRUCTION,
        context = context,
        history_block = history_block,
        query = query,
    )
}
