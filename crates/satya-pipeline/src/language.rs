//! Language detection and translation to English

use crate::error::PipelineError;
use crate::prompt::PromptBuilder;
use crate::types::LanguageOutcome;
use satya_domain::traits::LlmProvider;
use satya_domain::Language;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Detects the source language and produces English text
pub struct LanguageStage<L> {
    llm: Arc<L>,
    sample_chars: usize,
}

impl<L> LanguageStage<L>
where
    L: LlmProvider,
{
    /// Create a stage that sends the first `sample_chars` characters to detection
    pub fn new(llm: Arc<L>, sample_chars: usize) -> Self {
        Self { llm, sample_chars }
    }

    /// Detect the language of `text`
    ///
    /// Unrecognized labels map to the closest known language, or `Mixed`.
    pub async fn detect(&self, text: &str) -> Result<Language, PipelineError> {
        let sample: String = text.chars().take(self.sample_chars).collect();
        let prompt = PromptBuilder::language_detection(&sample);

        let label = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| PipelineError::Llm(format!("Language detection: {}", e)))?;

        let language = Language::from_label(&label);
        debug!(label = label.trim(), language = %language.name(), "Mapped language label");
        Ok(language)
    }

    /// Translate `text` to English; English input is returned unchanged
    ///
    /// Any failure aborts: there is no fallback to the untranslated text.
    pub async fn translate(&self, text: &str, language: Language) -> Result<String, PipelineError> {
        if language.is_english() {
            return Ok(text.to_string());
        }

        let prompt = PromptBuilder::translation(text, language);
        let translated = self.llm.generate(&prompt).await.map_err(|e| {
            warn!(language = language.name(), error = %e, "Translation failed");
            PipelineError::Translation(e.to_string())
        })?;

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(PipelineError::Translation(format!(
                "Empty translation from {}",
                language.name()
            )));
        }

        info!(language = language.name(), "Translated content to English");
        Ok(translated.to_string())
    }

    /// Detect, then translate
    pub async fn process(&self, text: &str) -> Result<LanguageOutcome, PipelineError> {
        let language = self.detect(text).await?;
        info!(language = language.name(), "Detected language");
        let english_text = self.translate(text, language).await?;
        Ok(LanguageOutcome {
            language,
            english_text,
        })
    }
}
