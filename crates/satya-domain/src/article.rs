//! Article module - one submission and its normalized text

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an article based on UUIDv7
///
/// UUIDv7 sorts chronologically, which keeps history listings cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(uuid::Uuid);

impl ArticleId {
    /// Generate a new UUIDv7-based ArticleId
    ///
    /// # Examples
    ///
    /// ```
    /// use satya_domain::ArticleId;
    ///
    /// let a = ArticleId::new();
    /// let b = ArticleId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse an ArticleId from its string form
    pub fn parse(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid article id: {}", e))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for ArticleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content submitted for verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Raw text, verified as-is
    Text,
    /// A web page to fetch and strip
    Url,
    /// A base64-encoded image handed to OCR
    Image,
}

impl InputType {
    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Url => "url",
            InputType::Image => "image",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(InputType::Text),
            "url" => Ok(InputType::Url),
            "image" => Ok(InputType::Image),
            other => Err(format!("Unknown input type: {}", other)),
        }
    }
}

/// A submission and the text derived from it
///
/// Articles are immutable once created; derived results are attached by
/// wrapping the article in a [`crate::StoredVerification`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: ArticleId,

    /// What kind of input was submitted
    pub input_type: InputType,

    /// Raw text, the URL, or an image reference (never the image bytes)
    pub content: String,

    /// Language label detected on the normalized text
    pub detected_language: crate::Language,

    /// Normalized text before translation
    pub original_text: String,

    /// English text used for claim extraction
    pub english_text: String,

    /// When the article was created
    pub created_at: DateTime<Utc>,
}
