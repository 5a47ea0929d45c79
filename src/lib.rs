use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuddyError>;

#[derive(Error, Debug)]
pub enum BuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod completions;
pub mod config;
pub mod database;
pub mod embeddings;
pub mod extract;
pub mod ingest;
pub mod memory;
pub mod server;
pub mod vector_store;
