//! Verdicts and the verification envelope

use crate::{Article, ArticleId, Claim, Language};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical outcome of verifying one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Credible sources support the claim
    True,
    /// Credible sources contradict the claim
    False,
    /// Evidence is split; the claim is partly true or distorted
    Misleading,
    /// No source took a position
    Unverified,
}

impl Verdict {
    /// All verdicts, in display order
    pub const ALL: [Verdict; 4] = [
        Verdict::True,
        Verdict::False,
        Verdict::Misleading,
        Verdict::Unverified,
    ];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "TRUE",
            Verdict::False => "FALSE",
            Verdict::Misleading => "MISLEADING",
            Verdict::Unverified => "UNVERIFIED",
        }
    }

    /// Whether this verdict marks the content as misinformation
    pub fn is_misinformation(&self) -> bool {
        matches!(self, Verdict::False | Verdict::Misleading)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRUE" => Ok(Verdict::True),
            "FALSE" => Ok(Verdict::False),
            "MISLEADING" => Ok(Verdict::Misleading),
            "UNVERIFIED" => Ok(Verdict::Unverified),
            other => Err(format!("Unknown verdict: {}", other)),
        }
    }
}

/// Response envelope for one verification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Article the claims were extracted from
    pub article_id: ArticleId,

    /// Detected source language
    pub detected_language: Language,

    /// First 500 characters of the pre-translation text
    pub original_text: String,

    /// Claims in extraction order
    pub claims: Vec<Claim>,

    /// Short synthesis across all claim verdicts
    pub overall_assessment: String,

    /// When verification finished
    pub timestamp: DateTime<Utc>,
}

impl VerificationResult {
    /// Count claims per verdict
    pub fn verdict_counts(&self) -> VerdictCounts {
        let mut counts = VerdictCounts::default();
        for claim in &self.claims {
            counts.record(claim.verdict);
        }
        counts
    }
}

/// Article and result persisted together as one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVerification {
    /// The submission
    pub article: Article,
    /// Its verification outcome
    pub result: VerificationResult,
}

/// Per-verdict claim counts; every verdict key is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCounts {
    /// Claims judged TRUE
    #[serde(rename = "TRUE")]
    pub true_count: u64,
    /// Claims judged FALSE
    #[serde(rename = "FALSE")]
    pub false_count: u64,
    /// Claims judged MISLEADING
    #[serde(rename = "MISLEADING")]
    pub misleading_count: u64,
    /// Claims left UNVERIFIED
    #[serde(rename = "UNVERIFIED")]
    pub unverified_count: u64,
}

impl VerdictCounts {
    /// Increment the counter for `verdict`
    pub fn record(&mut self, verdict: Verdict) {
        self.add(verdict, 1);
    }

    /// Add `n` to the counter for `verdict`
    pub fn add(&mut self, verdict: Verdict, n: u64) {
        match verdict {
            Verdict::True => self.true_count += n,
            Verdict::False => self.false_count += n,
            Verdict::Misleading => self.misleading_count += n,
            Verdict::Unverified => self.unverified_count += n,
        }
    }

    /// Get the counter for `verdict`
    pub fn get(&self, verdict: Verdict) -> u64 {
        match verdict {
            Verdict::True => self.true_count,
            Verdict::False => self.false_count,
            Verdict::Misleading => self.misleading_count,
            Verdict::Unverified => self.unverified_count,
        }
    }

    /// Sum over all verdicts
    pub fn total(&self) -> u64 {
        Verdict::ALL.iter().map(|v| self.get(*v)).sum()
    }
}

/// Aggregate statistics over the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStats {
    /// Number of stored articles
    pub total_articles: u64,
    /// Number of stored claims
    pub total_claims: u64,
    /// Claims per verdict
    pub verdict_distribution: VerdictCounts,
}
