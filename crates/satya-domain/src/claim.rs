//! Claim module - one verifiable assertion and its verdict

use crate::{ArticleId, SourceReference, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a claim based on UUIDv7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(uuid::Uuid);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use satya_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert_eq!(id.to_string().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a ClaimId from its string form
    pub fn parse(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid claim id: {}", e))
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named entity mentioned by a claim (person, place, organization, date)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity kind, e.g. "person"
    #[serde(rename = "type")]
    pub kind: String,
    /// Surface form
    pub value: String,
}

/// A claim extracted from an article, with its computed verdict
///
/// `verdict` and `confidence` are written once by the aggregator and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Owning article
    pub article_id: ArticleId,

    /// 1-based position in extraction order
    pub index: usize,

    /// Claim text in English
    pub claim_text: String,

    /// Named entities reported by the extractor
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Categorical verdict
    pub verdict: Verdict,

    /// Confidence in the verdict [0, 100]
    pub confidence: u8,

    /// Narrative explanation of the verdict
    pub explanation: String,

    /// Sources whose content supports the claim
    #[serde(default)]
    pub supporting_sources: Vec<SourceReference>,

    /// Sources whose content contradicts the claim
    #[serde(default)]
    pub contradicting_sources: Vec<SourceReference>,
}

impl Claim {
    /// Display label, e.g. `Claim #2`
    pub fn label(&self) -> String {
        format!("Claim #{}", self.index)
    }

    /// Whether no source took a position on this claim
    pub fn has_no_evidence(&self) -> bool {
        self.supporting_sources.is_empty() && self.contradicting_sources.is_empty()
    }
}
