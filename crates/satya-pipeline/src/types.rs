//! Request and response types for verification

use satya_domain::{InputType, VerificationResult};
use serde::{Deserialize, Serialize};

/// Request to verify one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// How `content` should be interpreted
    pub input_type: InputType,

    /// Raw text, a URL, or base64 image data
    pub content: String,
}

impl VerificationRequest {
    /// Raw text submission
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            input_type: InputType::Text,
            content: content.into(),
        }
    }

    /// URL submission
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            input_type: InputType::Url,
            content: url.into(),
        }
    }

    /// Base64 image submission (a `data:` URL prefix is accepted)
    pub fn image(base64: impl Into<String>) -> Self {
        Self {
            input_type: InputType::Image,
            content: base64.into(),
        }
    }
}

/// Outcome of a successful verification
///
/// Serializes as the [`VerificationResult`] fields plus `persistence_error`
/// when the document could not be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// The verification result
    #[serde(flatten)]
    pub result: VerificationResult,

    /// Why the result was not persisted, if it was not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
}

impl VerificationReport {
    /// Whether the result reached the store
    pub fn is_persisted(&self) -> bool {
        self.persistence_error.is_none()
    }
}

/// Text recovered from a submission, before language handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    /// What is recorded as the article content (image bytes are replaced by a reference)
    pub content: String,

    /// Plain text to verify
    pub text: String,
}

/// Output of the language stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOutcome {
    /// Detected language
    pub language: satya_domain::Language,

    /// Text in English (the input itself when already English)
    pub english_text: String,
}

/// A trusted source, as served by the sources listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Display name
    pub name: String,
    /// Registrable domain
    pub domain: String,
    /// Credibility [0, 100]
    pub credibility: u8,
    /// Organisation kind
    pub category: satya_domain::SourceCategory,
    /// Topics the source covers well
    pub specializations: Vec<String>,
    /// Reputation label derived from credibility
    pub reputation: String,
}

impl From<&satya_domain::SourceEntry> for SourceSummary {
    fn from(entry: &satya_domain::SourceEntry) -> Self {
        Self {
            name: entry.name.clone(),
            domain: entry.domain.clone(),
            credibility: entry.credibility,
            category: entry.category,
            specializations: entry.specializations.clone(),
            reputation: entry.reputation().to_string(),
        }
    }
}
