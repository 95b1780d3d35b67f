//! Configuration for the verification pipeline

use serde::{Deserialize, Serialize};

/// Configuration for the verification pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of claims verified per article
    pub max_claims: usize,

    /// Minimum length of the normalized text (characters)
    pub min_content_chars: usize,

    /// Maximum length of the normalized text (characters)
    pub max_content_chars: usize,

    /// Stance queries in flight per claim
    pub max_concurrent_source_queries: usize,

    /// Length of the original-text excerpt on results (characters)
    pub excerpt_chars: usize,

    /// Characters of the normalized text sent to language detection
    pub detection_sample_chars: usize,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_claims == 0 {
            return Err("max_claims must be greater than 0".to_string());
        }
        if self.max_content_chars == 0 {
            return Err("max_content_chars must be greater than 0".to_string());
        }
        if self.min_content_chars > self.max_content_chars {
            return Err("min_content_chars cannot exceed max_content_chars".to_string());
        }
        if self.max_concurrent_source_queries == 0 {
            return Err("max_concurrent_source_queries must be greater than 0".to_string());
        }
        if self.excerpt_chars == 0 {
            return Err("excerpt_chars must be greater than 0".to_string());
        }
        if self.detection_sample_chars == 0 {
            return Err("detection_sample_chars must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_claims: 5,
            min_content_chars: 10,
            max_content_chars: 50_000,
            max_concurrent_source_queries: 4,
            excerpt_chars: 500,
            detection_sample_chars: 500,
        }
    }
}

impl PipelineConfig {
    /// Sequential preset: one stance query at a time, fewer claims
    ///
    /// Suited to a local model that cannot serve parallel requests.
    pub fn sequential() -> Self {
        Self {
            max_claims: 3,
            max_concurrent_source_queries: 1,
            ..Self::default()
        }
    }

    /// Thorough preset: more claims, wider fan-out
    pub fn thorough() -> Self {
        Self {
            max_claims: 10,
            max_concurrent_source_queries: 8,
            max_content_chars: 100_000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
