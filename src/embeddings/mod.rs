// Embeddings module
// This module handles provider integration and content chunking

pub mod chunking;
pub mod openai;

pub use chunking::{
    METADATA_BYTE_QUOTA, TOKEN_BUDGET_MARGIN, estimate_token_count, pack_words, split_to_quota,
};
pub use openai::EmbeddingClient;
