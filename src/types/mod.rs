use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    pub query: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

// ============= Conversation Types =============

/// A single turn of the conversation, carried in the request.
///
/// The server keeps no session state; every request brings its own
/// trailing history window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Display label used when rendering history into the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

// ============= RAG Types =============

/// A bounded text segment produced from a larger document.
///
/// Ids are fresh v4 UUIDs per ingestion call. Re-ingesting the same
/// document produces new ids rather than deduplicating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Position of this chunk within its source document.
    pub chunk_index: usize,
    /// File path or logical name the chunk came from.
    pub source: String,
}

/// A single ranked match returned by retrieval.
///
/// Constructed per query, never persisted. The metadata map excludes the
/// internal text-storage key.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RetrievedResult {
    pub id: String,
    pub score: f32,
    pub text: String,
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
}

impl RetrievedResult {
    /// Source identifier from the metadata, or "unknown".
    pub fn source(&self) -> &str {
        self.metadata
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid chunking configuration: {0}")]
    InvalidChunking(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        // Collaborator failures carry upstream details (URLs, auth hints)
        // that must not reach API clients. Log them, return a fixed message.
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::VectorStore(msg) => {
                tracing::error!(error = %msg, "vector store request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream vector store unavailable".to_string(),
                )
            }
            AppError::Generation(msg) => {
                tracing::error!(error = %msg, "generation request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream generation service unavailable".to_string(),
                )
            }
            other => {
                tracing::error!(error = %other, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "User");
        assert_eq!(Role::Assistant.label(), "Assistant");
    }

    #[test]
    fn test_role_deserializes_lowercase() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role": "assistant", "content": "hi"}"#).unwrap();
        assert_eq!(turn.role, Role::Assistant);
    }

    #[test]
    fn test_retrieved_result_source_fallback() {
        let result = RetrievedResult {
            id: "1".to_string(),
            score: 0.5,
            text: "text".to_string(),
            metadata: Map::new(),
        };
        assert_eq!(result.source(), "unknown");
    }

    #[test]
    fn test_ask_request_history_defaults_empty() {
        let request: AskRequest = serde_json::from_str(r#"{"query": "pto"}"#).unwrap();
        assert!(request.history.is_empty());
    }
}
