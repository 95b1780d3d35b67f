//! Ollama Provider Implementation
//!
//! Integration with Ollama's HTTP API for text generation and, through a
//! vision-capable model, OCR.
//!
//! # Features
//!
//! - Async HTTP communication with the `/api/generate` endpoint
//! - JSON mode (`format: "json"`) for structured calls
//! - Separate model for image input
//! - Configurable transport timeout; no automatic retries
//!
//! # Examples
//!
//! ```no_run
//! use satya_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1")
//!     .unwrap()
//!     .with_vision_model("llava");
//! ```

use crate::LlmError;
use async_trait::async_trait;
use base64::Engine;
use satya_domain::traits::{LlmProvider, OcrProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const OCR_PROMPT: &str = "Extract all text from this image. If it contains Indian language text \
(Hindi, Tamil, Telugu, Bengali, etc.), include it as-is. Return only the extracted text without \
any additional commentary.";

/// Ollama API provider
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    vision_model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the default timeout
    ///
    /// The vision model defaults to `model`; override it with
    /// [`OllamaProvider::with_vision_model`].
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama provider with an explicit transport timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;
        let model = model.into();

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            vision_model: model.clone(),
            model,
            client,
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the model used for image input
    pub fn with_vision_model(mut self, vision_model: impl Into<String>) -> Self {
        self.vision_model = vision_model.into();
        self
    }

    /// Text model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single non-streaming call to `/api/generate`
    async fn call(&self, request: &OllamaGenerateRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!(model = request.model, prompt_len = request.prompt.len(), "Calling Ollama");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(request.model.to_string()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        Ok(body.response)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call(&OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: None,
            images: Vec::new(),
        })
        .await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: &str,
    ) -> Result<String, Self::Error> {
        // Ollama's JSON mode guarantees syntax, not shape; the caller validates
        self.call(&OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: Some("json"),
            images: Vec::new(),
        })
        .await
    }
}

#[async_trait]
impl OcrProvider for OllamaProvider {
    type Error = LlmError;

    async fn extract_text(&self, image: &[u8]) -> Result<String, Self::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let text = self
            .call(&OllamaGenerateRequest {
                model: &self.vision_model,
                prompt: OCR_PROMPT,
                stream: false,
                format: None,
                images: vec![encoded],
            })
            .await?;
        Ok(text.trim().to_string())
    }
}
