// Configuration management module
// TOML settings with validation, plus API secrets taken from the environment


use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 1536;
pub const DEFAULT_EMBEDDING_TOKEN_LIMIT: usize = 8192;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub pinecone: PineconeConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
    #[serde(skip)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_base: Url,
    pub embedding_model: String,
    pub embedding_token_limit: usize,
    pub embedding_dimension: u32,
    pub completion_model: String,
    pub completion_max_tokens: u32,
    pub completion_temperature: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse("https://api.openai.com").expect("default API base is valid"),
            embedding_model: "text-embedding-ada-002".to_string(),
            embedding_token_limit: DEFAULT_EMBEDDING_TOKEN_LIMIT,
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
            completion_model: "gpt-3.5-turbo".to_string(),
            completion_max_tokens: 150,
            completion_temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PineconeConfig {
    pub index_host: Url,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            index_host: Url::parse("https://culturebuddy.svc.pinecone.io")
                .expect("default index host is valid"),
        }
    }
}

/// Provider credentials. Never serialized to the config file and never
/// printed; `Debug` only reports whether each key is present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub openai_api_key: Option<String>,
    pub pinecone_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &redact(self.openai_api_key.as_deref()))
            .field(
                "pinecone_api_key",
                &redact(self.pinecone_api_key.as_deref()),
            )
            .finish()
    }
}

fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(_) => "(set)",
        None => "(unset)",
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid embedding token limit: {0} (must be between 1024 and 131072)")]
    InvalidTokenLimit(usize),
    #[error("Invalid embedding dimension: {0} (must be between 64 and 4096)")]
    InvalidEmbeddingDimension(u32),
    #[error("Invalid completion temperature: {0} (must be between 0.0 and 2.0)")]
    InvalidTemperature(f32),
    #[error("Invalid upload size limit: {0} bytes (must be at least 1024)")]
    InvalidUploadLimit(usize),
    #[error("Missing API key: {0} is not set")]
    MissingApiKey(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            toml::from_str::<Config>(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            Config::default()
        };
        config.base_dir = config_dir.as_ref().to_path_buf();
        config.apply_env();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                self.base_dir.display()
            )
        })?;

        let config_path = self.base_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get the platform configuration directory for the application
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("culture-buddy"))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Overlay secrets and the port from the process environment.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.secrets.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("PINECONE_API_KEY") {
            self.secrets.pinecone_api_key = Some(key);
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.openai.validate()?;
        Ok(())
    }

    /// Fail fast when the provider credentials a running server needs are
    /// absent. Kept out of `validate` so `config --show` works without keys.
    #[inline]
    pub fn ensure_secrets(&self) -> Result<(), ConfigError> {
        if self.secrets.openai_api_key.is_none() {
            return Err(ConfigError::MissingApiKey("OPENAI_API_KEY"));
        }
        if self.secrets.pinecone_api_key.is_none() {
            return Err(ConfigError::MissingApiKey("PINECONE_API_KEY"));
        }
        Ok(())
    }

    #[inline]
    pub fn database_path(&self) -> PathBuf {
        self.base_dir.join("culturebuddy.db")
    }

    /// Upload directory, resolved against the base directory when relative.
    #[inline]
    pub fn upload_dir_path(&self) -> PathBuf {
        if self.server.upload_dir.is_absolute() {
            self.server.upload_dir.clone()
        } else {
            self.base_dir.join(&self.server.upload_dir)
        }
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            openai: OpenAiConfig::default(),
            pinecone: PineconeConfig::default(),
            base_dir: PathBuf::new(),
            secrets: Secrets::default(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        if self.max_upload_bytes < 1024 {
            return Err(ConfigError::InvalidUploadLimit(self.max_upload_bytes));
        }
        Ok(())
    }
}

impl OpenAiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.embedding_model.clone()));
        }
        if self.completion_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.completion_model.clone()));
        }
        if !(1024..=131_072).contains(&self.embedding_token_limit) {
            return Err(ConfigError::InvalidTokenLimit(self.embedding_token_limit));
        }
        if !(64..=4096).contains(&self.embedding_dimension) {
            return Err(ConfigError::InvalidEmbeddingDimension(
                self.embedding_dimension,
            ));
        }
        if !(0.0..=2.0).contains(&self.completion_temperature) {
            return Err(ConfigError::InvalidTemperature(self.completion_temperature));
        }
        Ok(())
    }
}
