//! Question-answering endpoint.

use crate::types::{AppError, AskRequest, AskResponse, HealthResponse, Result};
use crate::AppState;
use axum::{extract::State, Json};
use std::time::Instant;

/// Number of chunks retrieved per question.
const TOP_K: usize = 3;

/// Answer a question using retrieved policy context.
#[utoipa::path(
    post,
    path = "/api/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Generated answer", body = AskResponse),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Upstream collaborator unavailable")
    ),
    tag = "ask"
)]
pub async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    if payload.query.trim().is_empty() {
        return Err(AppError::InvalidInput("Query required".into()));
    }

    let context = state
        .retriever
        .retrieve_as_context(&payload.query, TOP_K)
        .await?;

    let answer = state
        .generator
        .generate(&payload.query, &context, &payload.history)
        .await?;

    tracing::info!(
        history_turns = payload.history.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "answered question"
    );

    Ok(Json(AskResponse { answer }))
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
