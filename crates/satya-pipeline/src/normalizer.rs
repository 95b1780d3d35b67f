//! Input normalization: text, URL, or image in; plain text out

use crate::error::PipelineError;
use crate::fetch::{ContentFetcher, FetchedPage};
use crate::types::{NormalizedInput, VerificationRequest};
use base64::Engine;
use regex::{Captures, Regex};
use satya_domain::registry::domain_from_url;
use satya_domain::traits::OcrProvider;
use satya_domain::InputType;
use tracing::{debug, info};

/// Strips HTML down to readable text
///
/// Removes `script`/`style`/`noscript` blocks, comments and tags, decodes
/// entities, and collapses whitespace.
pub struct MarkupStripper {
    blocks: Regex,
    comments: Regex,
    tags: Regex,
    numeric_entities: Regex,
    named_entities: Regex,
    whitespace: Regex,
}

impl MarkupStripper {
    /// Compile the stripping patterns
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            blocks: Regex::new(
                r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>",
            )?,
            comments: Regex::new(r"(?s)<!--.*?-->")?,
            tags: Regex::new(r"(?s)<[^>]*>")?,
            numeric_entities: Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);")?,
            named_entities: Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Strip markup from an HTML document
    pub fn strip(&self, html: &str) -> String {
        let text = self.blocks.replace_all(html, " ");
        let text = self.comments.replace_all(&text, " ");
        let text = self.tags.replace_all(&text, " ");
        let text = self.numeric_entities.replace_all(&text, |caps: &Captures| {
            let code = &caps[1];
            let parsed = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            parsed
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| " ".to_string())
        });
        let text = self.named_entities.replace_all(&text, |caps: &Captures| {
            match &caps[1] {
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                "apos" => "'",
                _ => " ",
            }
            .to_string()
        });
        self.collapse(&text)
    }

    /// Collapse runs of whitespace into single spaces
    pub fn collapse(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }
}

/// Turns a [`VerificationRequest`] into plain text
pub struct InputNormalizer {
    stripper: MarkupStripper,
    min_chars: usize,
    max_chars: usize,
}

impl InputNormalizer {
    /// Create a normalizer enforcing the given text length bounds
    pub fn new(min_chars: usize, max_chars: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            stripper: MarkupStripper::new()?,
            min_chars,
            max_chars,
        })
    }

    /// Normalize one submission
    pub async fn normalize<O>(
        &self,
        request: &VerificationRequest,
        fetcher: &dyn ContentFetcher,
        ocr: &O,
    ) -> Result<NormalizedInput, PipelineError>
    where
        O: OcrProvider + ?Sized,
    {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let normalized = match request.input_type {
            InputType::Text => NormalizedInput {
                content: request.content.clone(),
                text: content.to_string(),
            },
            InputType::Url => self.normalize_url(content, fetcher).await?,
            InputType::Image => Self::normalize_image(content, ocr).await?,
        };

        let length = normalized.text.chars().count();
        if length < self.min_chars {
            return Err(PipelineError::ContentTooShort(length, self.min_chars));
        }
        if length > self.max_chars {
            return Err(PipelineError::InvalidInput(format!(
                "Content too long: {} chars (max: {})",
                length, self.max_chars
            )));
        }

        debug!(input_type = %request.input_type, chars = length, "Normalized input");
        Ok(normalized)
    }

    async fn normalize_url(
        &self,
        url: &str,
        fetcher: &dyn ContentFetcher,
    ) -> Result<NormalizedInput, PipelineError> {
        let lower = url.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://"))
            || domain_from_url(url).is_empty()
        {
            return Err(PipelineError::InvalidInput(format!("Not an http(s) URL: {}", url)));
        }

        info!(url, "Fetching URL input");
        let page = fetcher
            .fetch(url)
            .await
            .map_err(|e| PipelineError::Fetch(format!("{}: {}", url, e)))?;

        Ok(NormalizedInput {
            content: url.to_string(),
            text: self.page_text(&page)?,
        })
    }

    /// Readable text of a fetched page
    pub fn page_text(&self, page: &FetchedPage) -> Result<String, PipelineError> {
        let content_type = page
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

        let is_html = match content_type.as_deref() {
            Some(ct) if ct.contains("html") => true,
            Some(ct) if ct.starts_with("text/") || ct.ends_with("xml") || ct.ends_with("json") => {
                false
            }
            Some(ct) => {
                return Err(PipelineError::Fetch(format!("Unsupported content type: {}", ct)));
            }
            // No header: sniff
            None => page.body.trim_start().starts_with('<'),
        };

        if is_html {
            Ok(self.stripper.strip(&page.body))
        } else {
            Ok(self.stripper.collapse(&page.body))
        }
    }

    async fn normalize_image<O>(content: &str, ocr: &O) -> Result<NormalizedInput, PipelineError>
    where
        O: OcrProvider + ?Sized,
    {
        let (subtype, bytes) = decode_image(content)?;
        info!(bytes = bytes.len(), "Running OCR on image input");

        let text = ocr
            .extract_text(&bytes)
            .await
            .map_err(|e| PipelineError::Ocr(e.to_string()))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::Ocr("No text found in image".to_string()));
        }

        Ok(NormalizedInput {
            content: format!("image/{}:{} bytes", subtype, bytes.len()),
            text: text.to_string(),
        })
    }
}

/// Decode base64 image data, with or without a `data:image/...;base64,` prefix
///
/// Returns the image subtype (`unknown` without a prefix) and the raw bytes.
pub fn decode_image(content: &str) -> Result<(String, Vec<u8>), PipelineError> {
    let content = content.trim();
    let (subtype, data) = match content.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(',').ok_or_else(|| {
                PipelineError::InvalidInput("Malformed data URL".to_string())
            })?;
            let mime = header.strip_suffix(";base64").ok_or_else(|| {
                PipelineError::InvalidInput("Data URL is not base64-encoded".to_string())
            })?;
            let subtype = mime.strip_prefix("image/").ok_or_else(|| {
                PipelineError::InvalidInput(format!("Not an image: {}", mime))
            })?;
            (subtype.to_string(), data)
        }
        None => ("unknown".to_string(), content),
    };

    // Base64 copied from emails or terminals often carries line breaks
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| PipelineError::InvalidInput(format!("Invalid base64 image: {}", e)))?;
    if bytes.is_empty() {
        return Err(PipelineError::InvalidInput("Image is empty".to_string()));
    }
    Ok((subtype, bytes))
}
