// Ingestion module
// Composes extraction, chunking, embedding, and vector upserts


use std::path::{Path, PathBuf};

use chrono::Utc;
use futures::future::try_join_all;
use itertools::Itertools;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{ChatMessage, User};
use crate::embeddings::{EmbeddingClient, split_to_quota};
use crate::extract::extract_text;
use crate::vector_store::{
    CHAT_RECORD_ID, ROSTER_RECORD_ID, VectorMetadata, VectorRecord, VectorStoreClient,
    singleton_part_id,
};
use crate::{BuddyError, Result};

/// Subject label for ingested bot description text.
pub const BOT_INFO_SUBJECT: &str = "BotInfo";

/// Subject label for chat transcript records.
pub const CHAT_SUBJECT: &str = "ChatMessage";

/// Subject label for the employee roster record.
pub const ROSTER_SUBJECT: &str = "EmployeeData";

/// An uploaded document after extraction, before embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub subject: String,
    pub context: String,
}

#[derive(Debug, Clone)]
pub struct Ingestor {
    embeddings: EmbeddingClient,
    vectors: VectorStoreClient,
}

impl Ingestor {
    #[inline]
    pub fn new(embeddings: EmbeddingClient, vectors: VectorStoreClient) -> Self {
        Self {
            embeddings,
            vectors,
        }
    }

    /// Ingest uploaded files. Extractions run concurrently; each document
    /// is then embedded once and persisted as one vector record per quota
    /// part under generated ids.
    #[inline]
    pub async fn ingest_files(&self, paths: &[PathBuf]) -> Result<()> {
        let docs = try_join_all(paths.iter().map(|path| self.extract_document(path))).await?;

        for doc in &docs {
            let embedding = self.embeddings.embed(&doc.context).await;
            if embedding.is_empty() {
                return Err(BuddyError::Embedding(format!(
                    "Embedding failed for document '{}'",
                    doc.subject
                )));
            }

            for part in split_to_quota(&doc.context) {
                let record = VectorRecord {
                    id: generated_record_id(),
                    values: embedding.clone(),
                    metadata: VectorMetadata {
                        subject: doc.subject.clone(),
                        context: part,
                    },
                };
                self.upsert_record(&record).await?;
            }

            info!("Ingested document '{}'", doc.subject);
        }

        Ok(())
    }

    /// Ingest an arbitrary JSON blob as a single document under the given
    /// subject.
    #[inline]
    pub async fn ingest_json(&self, json_data: &serde_json::Value, subject: &str) -> Result<()> {
        let context = serde_json::to_string(json_data)
            .map_err(|error| BuddyError::Other(error.into()))?;

        let embedding = self.embeddings.embed(&context).await;
        if embedding.is_empty() {
            return Err(BuddyError::Embedding(format!(
                "Embedding failed for JSON document '{}'",
                subject
            )));
        }

        let record = VectorRecord {
            id: generated_record_id(),
            values: embedding,
            metadata: VectorMetadata {
                subject: subject.to_string(),
                context,
            },
        };
        self.upsert_record(&record).await?;

        info!("Ingested JSON document '{}'", subject);
        Ok(())
    }

    /// Ingest free text (the bot description) under the fixed subject
    /// label, one record per quota part.
    #[inline]
    pub async fn ingest_text(&self, text: &str) -> Result<()> {
        let embedding = self.embeddings.embed(text).await;
        if embedding.is_empty() {
            return Err(BuddyError::Embedding(
                "Embedding failed for bot description text".to_string(),
            ));
        }

        for part in split_to_quota(text) {
            let record = VectorRecord {
                id: generated_record_id(),
                values: embedding.clone(),
                metadata: VectorMetadata {
                    subject: BOT_INFO_SUBJECT.to_string(),
                    context: part,
                },
            };
            self.upsert_record(&record).await?;
        }

        info!("Ingested bot description text");
        Ok(())
    }

    /// Record one chat message into the chat transcript singleton.
    ///
    /// The embedding is computed but the update only rewrites metadata; the
    /// index keeps whatever vector the record already has.
    #[inline]
    pub async fn record_chat_message(&self, chat_message: &str) -> Result<()> {
        let embedding = self.embeddings.embed(chat_message).await;
        if embedding.is_empty() {
            warn!("Embedding failed for chat message; continuing with metadata update");
        }

        let metadata = json!({
            "message": chat_message,
            "timestamp": Utc::now().to_rfc3339(),
            "context": CHAT_SUBJECT,
        });

        self.update_singleton(CHAT_RECORD_ID, CHAT_SUBJECT, &metadata)
            .await
    }

    /// Re-sync the full employee roster into the roster singleton.
    /// Every write re-embeds the whole roster.
    #[inline]
    pub async fn sync_roster(&self, users: &[User]) -> Result<()> {
        let combined = users
            .iter()
            .map(|user| {
                format!(
                    "{}, Email: {}, About: {}",
                    user.name, user.email, user.about
                )
            })
            .join(" | ");

        let embedding = self.embeddings.embed(&combined).await;
        if embedding.is_empty() {
            warn!("Embedding failed for roster; continuing with metadata update");
        }

        let metadata = json!({
            "users": users
                .iter()
                .map(|user| json!({
                    "id": user.id,
                    "name": user.name,
                    "email": user.email,
                    "about": user.about,
                }))
                .collect::<Vec<_>>(),
            "context": ROSTER_SUBJECT,
        });

        self.update_singleton(ROSTER_RECORD_ID, ROSTER_SUBJECT, &metadata)
            .await
    }

    /// Re-sync the full chat transcript into the chat singleton.
    #[inline]
    pub async fn sync_transcript(&self, messages: &[ChatMessage]) -> Result<()> {
        let combined = messages.iter().map(|chat| chat.message.as_str()).join("\n");

        let embedding = self.embeddings.embed(&combined).await;
        if embedding.is_empty() {
            warn!("Embedding failed for transcript; continuing with metadata update");
        }

        let metadata = json!({
            "messages": messages
                .iter()
                .map(|chat| chat.message.as_str())
                .collect::<Vec<_>>(),
            "context": CHAT_SUBJECT,
        });

        self.update_singleton(CHAT_RECORD_ID, CHAT_SUBJECT, &metadata)
            .await
    }

    async fn upsert_record(&self, record: &VectorRecord) -> Result<()> {
        self.vectors
            .upsert(std::slice::from_ref(record))
            .await
            .map_err(|error| BuddyError::VectorStore(format!("{:#}", error)))
    }

    async fn extract_document(&self, path: &Path) -> Result<Document> {
        let context = extract_text(path).await?;
        let subject = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();

        Ok(Document {
            id: generated_record_id(),
            subject,
            context,
        })
    }

    /// Split serialized metadata to the byte quota and rewrite the
    /// singleton's parts under their deterministic ids. Last writer wins.
    async fn update_singleton(
        &self,
        base_id: &str,
        subject: &str,
        metadata: &serde_json::Value,
    ) -> Result<()> {
        let serialized = serde_json::to_string(metadata)
            .map_err(|error| BuddyError::Other(error.into()))?;

        for (part_index, part) in split_to_quota(&serialized).into_iter().enumerate() {
            self.vectors
                .update_metadata(
                    &singleton_part_id(base_id, part_index),
                    &VectorMetadata {
                        subject: subject.to_string(),
                        context: part,
                    },
                )
                .await
                .map_err(|error| BuddyError::VectorStore(format!("{:#}", error)))?;
        }

        info!("Updated singleton record '{}'", base_id);
        Ok(())
    }
}

fn generated_record_id() -> String {
    format!("doc-{}", Uuid::new_v4())
}
