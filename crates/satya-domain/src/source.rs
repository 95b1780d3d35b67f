//! Source references embedded in claims

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position a source takes on a claim
///
/// Silence is not a stance: sources that say nothing are dropped before a
/// [`SourceReference`] is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// The source's content backs the claim
    Supports,
    /// The source's content refutes the claim
    Contradicts,
}

impl Stance {
    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Supports => "supports",
            Stance::Contradicts => "contradicts",
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One trusted source's evidence for or against a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Registry name of the source
    pub source_name: String,

    /// Article URL cited by the model, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Credibility copied from the registry when the claim was verified
    pub credibility_score: u8,

    /// Excerpt or summary of what the source says
    pub relevant_text: String,

    /// Supports or contradicts
    pub stance: Stance,
}
