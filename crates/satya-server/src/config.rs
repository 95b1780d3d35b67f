//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, database path, CORS
//! origins, the LLM backend, pipeline tuning, and an optional replacement
//! source registry.

use satya_domain::{RegistryError, SourceEntry, SourceRegistry};
use satya_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range or malformed
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The `[[sources]]` table does not form a valid registry
    #[error("Invalid source registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8001)
    pub bind_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Timeout for fetching `url` submissions (seconds)
    pub fetch_timeout_secs: u64,

    /// LLM backend
    pub llm: LlmConfig,

    /// Pipeline tuning
    pub pipeline: PipelineConfig,

    /// Replacement for the built-in source registry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceEntry>>,
}

/// Ollama backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Text model used for every stage except OCR
    pub model: String,

    /// Vision model used for OCR; the text model when unset
    pub vision_model: Option<String>,

    /// HTTP transport timeout per model call (seconds)
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: satya_llm::ollama::DEFAULT_ENDPOINT.to_string(),
            model: "llama3.1".to_string(),
            vision_model: Some("llava".to_string()),
            request_timeout_secs: satya_llm::ollama::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 8001,
            database_path: PathBuf::from("satya.db"),
            cors_origins: vec!["*".to_string()],
            fetch_timeout_secs: satya_pipeline::DEFAULT_FETCH_TIMEOUT_SECS,
            llm: LlmConfig::default(),
            pipeline: PipelineConfig::default(),
            sources: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address is empty".to_string()));
        }
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.endpoint is empty".to_string()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model is empty".to_string()));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "llm.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.cors_origins.is_empty() {
            return Err(ConfigError::Invalid("cors_origins is empty".to_string()));
        }
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("pipeline: {}", e)))?;
        self.registry()?;
        Ok(())
    }

    /// The source registry: the `[[sources]]` table if present, else the built-in one
    pub fn registry(&self) -> Result<SourceRegistry, ConfigError> {
        match &self.sources {
            Some(entries) => Ok(SourceRegistry::from_entries(entries.clone())?),
            None => Ok(SourceRegistry::builtin()),
        }
    }

    /// Vision model name, falling back to the text model
    pub fn vision_model(&self) -> &str {
        self.llm.vision_model.as_deref().unwrap_or(&self.llm.model)
    }

    /// Apply `host:port` and database overrides from the command line or environment
    pub fn apply_overrides(
        &mut self,
        bind: Option<&str>,
        database: Option<&Path>,
    ) -> Result<(), ConfigError> {
        if let Some(bind) = bind {
            let (address, port) = bind.rsplit_once(':').ok_or_else(|| {
                ConfigError::Invalid(format!("bind must be host:port, got {}", bind))
            })?;
            self.bind_port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid port in bind: {}", bind)))?;
            self.bind_address = address.trim_matches(['[', ']']).to_string();
        }
        if let Some(database) = database {
            self.database_path = database.to_path_buf();
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        if self.bind_address.contains(':') {
            format!("[{}]:{}", self.bind_address, self.bind_port)
        } else {
            format!("{}:{}", self.bind_address, self.bind_port)
        }
    }
}
