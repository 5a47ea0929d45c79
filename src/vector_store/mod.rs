// Vector store gateway
// Wraps the upsert/update/query data plane of an external vector index

#[cfg(test)]
mod tests;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Config;

/// Well-known id of the chat transcript singleton record.
pub const CHAT_RECORD_ID: &str = "chat-record";

/// Well-known id of the employee roster singleton record.
pub const ROSTER_RECORD_ID: &str = "all-users";

/// Id for one part of a singleton record: the base id for the first part,
/// the base id with a `2` suffix for the overflow half.
///
/// The same ids are addressed on every sync, so concurrent writers race and
/// the last writer wins; there is no optimistic concurrency check.
#[inline]
pub fn singleton_part_id(base: &str, part: usize) -> String {
    if part == 0 {
        base.to_string()
    } else {
        format!("{}2", base)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorMetadata {
    pub subject: String,
    pub context: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VectorMetadata,
}

/// Similarity match with metadata coerced to strings.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    pub metadata: VectorMetadata,
}

#[derive(Debug, Clone)]
pub struct VectorStoreClient {
    index_host: Url,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    id: &'a str,
    #[serde(rename = "setMetadata")]
    set_metadata: &'a VectorMetadata,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<serde_json::Value>,
}

impl VectorStoreClient {
    #[inline]
    pub fn new(config: &Config) -> Self {
        Self {
            index_host: config.pinecone.index_host.clone(),
            api_key: config
                .secrets
                .pinecone_api_key
                .clone()
                .unwrap_or_default(),
            client: reqwest::Client::new(),
        }
    }

    /// Upsert records into the index. A record carrying a zero-length
    /// vector (the embedding-failure signal) is rejected locally rather
    /// than forwarded upstream.
    #[inline]
    pub async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        if records.iter().any(|record| record.values.is_empty()) {
            bail!("Refusing to upsert a record with an empty embedding vector");
        }

        let url = self
            .index_host
            .join("/vectors/upsert")
            .context("Failed to build upsert URL")?;

        debug!("Upserting {} vector record(s)", records.len());

        self.client
            .post(url)
            .header("Api-Key", &self.api_key)
            .json(&UpsertRequest { vectors: records })
            .send()
            .await
            .context("Failed to reach vector index")?
            .error_for_status()
            .context("Vector index rejected upsert")?;

        Ok(())
    }

    /// Rewrite the metadata of an existing record in place. The stored
    /// vector is left untouched.
    #[inline]
    pub async fn update_metadata(&self, id: &str, metadata: &VectorMetadata) -> Result<()> {
        let url = self
            .index_host
            .join("/vectors/update")
            .context("Failed to build update URL")?;

        debug!("Updating metadata for record {}", id);

        self.client
            .post(url)
            .header("Api-Key", &self.api_key)
            .json(&UpdateRequest {
                id,
                set_metadata: metadata,
            })
            .send()
            .await
            .context("Failed to reach vector index")?
            .error_for_status()
            .context("Vector index rejected update")?;

        Ok(())
    }

    /// Similarity-search the index. Matches with absent metadata come back
    /// with placeholder subject and context strings. An empty index yields
    /// an empty list.
    #[inline]
    pub async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        if vector.is_empty() {
            bail!("Refusing to query with an empty embedding vector");
        }

        let url = self
            .index_host
            .join("/query")
            .context("Failed to build query URL")?;

        let response: QueryResponse = self
            .client
            .post(url)
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata: true,
            })
            .send()
            .await
            .context("Failed to reach vector index")?
            .error_for_status()
            .context("Vector index rejected query")?
            .json()
            .await
            .context("Failed to parse query response")?;

        debug!("Query returned {} match(es)", response.matches.len());

        Ok(response.matches.into_iter().map(coerce_match).collect())
    }
}

fn coerce_match(wire: WireMatch) -> VectorMatch {
    let metadata = wire.metadata.as_ref();
    let subject = metadata
        .and_then(|m| m.get("subject"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string();
    let context = metadata
        .and_then(|m| m.get("context"))
        .and_then(|v| v.as_str())
        .unwrap_or("No context available")
        .to_string();

    VectorMatch {
        id: wire.id,
        score: wire.score,
        metadata: VectorMetadata { subject, context },
    }
}
