//! Error types for the verification pipeline

use thiserror::Error;

/// Errors that can abort a verification
///
/// Any stage failure aborts the whole request: no partial result is
/// returned and nothing is persisted.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Submitted content is blank
    #[error("Content is empty")]
    EmptyInput,

    /// Normalized text is too short to contain a claim
    #[error("Content too short: {0} chars (min: {1})")]
    ContentTooShort(usize, usize),

    /// Malformed request (unknown input type, invalid base64, bad URL)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL could not be fetched or did not return text
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// OCR failed or found no text
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// Translation to English failed
    #[error("Translation failed: {0}")]
    Translation(String),

    /// The model answered with something that does not match the expected schema
    #[error("Invalid model response: {0}")]
    ModelResponse(String),

    /// LLM transport failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// A stance referenced a source missing from the registry
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// Document store failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Pipeline could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Whether the caller's input caused the failure
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PipelineError::EmptyInput
                | PipelineError::ContentTooShort(_, _)
                | PipelineError::InvalidInput(_)
                | PipelineError::Fetch(_)
                | PipelineError::Ocr(_)
        )
    }

    /// Whether an upstream model failed
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Translation(_) | PipelineError::ModelResponse(_) | PipelineError::Llm(_)
        )
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::ModelResponse(e.to_string())
    }
}
