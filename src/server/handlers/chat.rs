use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    #[serde(rename = "userMessage")]
    pub user_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub reply: String,
}

/// Single-turn completion with no retrieval and no memory.
pub async fn chatbot(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatbotRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let user_message = body
        .user_message
        .ok_or_else(|| ApiError::missing_field("userMessage"))?;

    let reply = state
        .completions
        .complete(&user_message)
        .await
        .map_err(|error| ApiError::Upstream(format!("{:#}", error)))?;

    Ok(Json(ReplyResponse { reply }))
}

/// Retrieval-augmented chat with per-user memory.
///
/// Embeds the raw query, takes the single nearest vector match, folds its
/// context and the user's remembered lines into one prompt, completes, then
/// remembers both turns.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let user_id = body.user_id.ok_or_else(|| ApiError::missing_field("userId"))?;
    let query = body.query.ok_or_else(|| ApiError::missing_field("query"))?;

    let query_embedding = state.embeddings.embed(&query).await;
    let matches = state
        .vectors
        .query(&query_embedding, 1)
        .await
        .map_err(|error| ApiError::Upstream(format!("{:#}", error)))?;

    let context = matches
        .iter()
        .map(|found| found.metadata.context.as_str())
        .join("\n");

    let history = state.sessions.recent(&user_id).await?;
    let prompt = format!(
        "{}\n\n{}\nUser: {}\nAI:",
        context,
        history.join("\n"),
        query
    );
    debug!("Chat prompt assembled ({} chars)", prompt.len());

    let reply = state
        .completions
        .clone()
        .with_sampling(
            state.config.openai.completion_max_tokens,
            state.config.openai.completion_temperature,
        )
        .complete(&prompt)
        .await
        .map_err(|error| ApiError::Upstream(format!("{:#}", error)))?;

    state
        .sessions
        .remember(&user_id, format!("User: {}", query), format!("AI: {}", reply))
        .await?;

    Ok(Json(ReplyResponse { reply }))
}
