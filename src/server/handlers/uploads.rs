use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JsonDocumentRequest {
    #[serde(rename = "jsonData")]
    pub json_data: Option<Value>,
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BotTextRequest {
    #[serde(rename = "botDescription")]
    pub bot_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUploadRequest {
    pub chat: Option<String>,
}

/// Ingest a multipart batch of documents. Each file is written to the
/// upload directory under its original (basename-only) name, then the whole
/// batch is extracted and ingested.
pub async fn upload_documents(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let upload_dir = state.config.upload_dir_path();
    let mut saved_paths = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::Validation(error.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        // Basename only, so a crafted filename cannot escape the upload dir
        let Some(file_name) = Path::new(&file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
        else {
            continue;
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|error| ApiError::Validation(error.to_string()))?;

        let destination = upload_dir.join(&file_name);
        tokio::fs::write(&destination, &bytes)
            .await
            .map_err(|error| ApiError::Internal(error.into()))?;
        info!("Stored upload {} ({} bytes)", destination.display(), bytes.len());

        saved_paths.push(destination);
    }

    if saved_paths.is_empty() {
        return Err(ApiError::Validation("No files uploaded".to_string()));
    }

    state.ingestor.ingest_files(&saved_paths).await?;

    Ok(Json(json!({ "message": "Documents uploaded successfully" })))
}

/// Ingest an arbitrary JSON blob as one document.
pub async fn upload_json_document(
    State(state): State<Arc<AppState>>,
    Json(body): Json<JsonDocumentRequest>,
) -> Result<Json<Value>, ApiError> {
    let json_data = body
        .json_data
        .ok_or_else(|| ApiError::missing_field("jsonData"))?;
    let subject = body.subject.ok_or_else(|| ApiError::missing_field("subject"))?;

    state.ingestor.ingest_json(&json_data, &subject).await?;

    Ok(Json(json!({ "message": "JSON document uploaded successfully" })))
}

/// Ingest the bot description under its fixed subject label.
pub async fn upload_text(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BotTextRequest>,
) -> Result<Json<Value>, ApiError> {
    let bot_description = body
        .bot_description
        .ok_or_else(|| ApiError::missing_field("botDescription"))?;

    state.ingestor.ingest_text(&bot_description).await?;

    Ok(Json(json!({ "message": "Text uploaded successfully" })))
}

/// Record a chat transcript string into the chat singleton record.
pub async fn upload_chats(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatUploadRequest>,
) -> Result<Json<Value>, ApiError> {
    let chat = body.chat.ok_or_else(|| ApiError::missing_field("chat"))?;

    state.ingestor.record_chat_message(&chat).await?;

    Ok(Json(json!({ "message": "Chat uploaded successfully" })))
}
