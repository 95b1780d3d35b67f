//! Language labels recognised by the detection stage

use serde::{Deserialize, Serialize};
use std::fmt;

/// Similarity floor for accepting a misspelled label as a known language
pub const LABEL_SIMILARITY_FLOOR: f64 = 0.85;

/// Source language of a submission
///
/// The set is fixed; anything the detector reports outside it is mapped to
/// the closest member (see [`Language::from_label`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// Hindi
    Hindi,
    /// English
    English,
    /// Tamil
    Tamil,
    /// Telugu
    Telugu,
    /// Bengali
    Bengali,
    /// Kannada
    Kannada,
    /// Malayalam
    Malayalam,
    /// Marathi
    Marathi,
    /// Several languages, or nothing recognisable
    Mixed,
}

impl Language {
    /// All single languages (everything except `Mixed`)
    pub const SINGLE: [Language; 8] = [
        Language::Hindi,
        Language::English,
        Language::Tamil,
        Language::Telugu,
        Language::Bengali,
        Language::Kannada,
        Language::Malayalam,
        Language::Marathi,
    ];

    /// Display name, also used in prompts
    pub fn name(&self) -> &'static str {
        match self {
            Language::Hindi => "Hindi",
            Language::English => "English",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Bengali => "Bengali",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Marathi => "Marathi",
            Language::Mixed => "Mixed",
        }
    }

    /// Whether translation can be skipped
    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Language::Hindi => &["hi", "hin", "हिन्दी", "हिंदी"],
            Language::English => &["en", "eng"],
            Language::Tamil => &["ta", "tam", "தமிழ்"],
            Language::Telugu => &["te", "tel", "తెలుగు"],
            Language::Bengali => &["bn", "ben", "bangla", "বাংলা"],
            Language::Kannada => &["kn", "kan", "ಕನ್ನಡ"],
            Language::Malayalam => &["ml", "mal", "മലയാളം"],
            Language::Marathi => &["mr", "mar", "मराठी"],
            Language::Mixed => &["mixed", "multiple", "hinglish", "code-mixed", "code mixed"],
        }
    }

    /// Lowercase English name followed by the longer aliases (no short codes)
    fn spellings(&self) -> impl Iterator<Item = String> {
        std::iter::once(self.name().to_lowercase()).chain(
            self.aliases()
                .iter()
                .filter(|alias| alias.chars().count() > 3)
                .map(|alias| alias.to_string()),
        )
    }

    fn matches_word(&self, word: &str) -> bool {
        self.spellings().any(|spelling| spelling == word)
    }

    /// Map a detector's free-text label to the closest known language
    ///
    /// Never fails: unrecognisable labels become [`Language::Mixed`].
    ///
    /// # Examples
    ///
    /// ```
    /// use satya_domain::Language;
    ///
    /// assert_eq!(Language::from_label("Hindi."), Language::Hindi);
    /// assert_eq!(Language::from_label("ta"), Language::Tamil);
    /// assert_eq!(Language::from_label("Malyalam"), Language::Malayalam);
    /// assert_eq!(Language::from_label("Klingon"), Language::Mixed);
    /// ```
    pub fn from_label(label: &str) -> Language {
        let normalized = normalize_label(label);
        if normalized.is_empty() {
            return Language::Mixed;
        }

        // Exact names, codes, and native spellings
        for language in Language::SINGLE.iter().chain(std::iter::once(&Language::Mixed)) {
            if normalized == language.name().to_lowercase()
                || language.aliases().contains(&normalized.as_str())
            {
                return *language;
            }
        }

        if Language::Mixed
            .aliases()
            .iter()
            .any(|alias| normalized.contains(alias))
        {
            return Language::Mixed;
        }

        // Sentences such as "the text is in tamil"
        let mentioned: Vec<Language> = Language::SINGLE
            .iter()
            .copied()
            .filter(|language| {
                normalized
                    .split(|c: char| !is_label_char(c))
                    .any(|word| language.matches_word(word))
            })
            .collect();
        match mentioned.as_slice() {
            [single] => return *single,
            [_, _, ..] => return Language::Mixed,
            [] => {}
        }

        // Misspellings
        let best = Language::SINGLE
            .iter()
            .map(|language| {
                let score = language
                    .spellings()
                    .map(|spelling| strsim::jaro_winkler(&normalized, &spelling))
                    .fold(0.0, f64::max);
                (*language, score)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match best {
            Some((language, score)) if score >= LABEL_SIMILARITY_FLOOR => language,
            _ => Language::Mixed,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase, first line only, label prefixes and wrapping punctuation removed
fn normalize_label(label: &str) -> String {
    let first_line = label.trim().lines().next().unwrap_or("");
    let value = match first_line.rsplit_once(':') {
        Some((_, rest)) => rest,
        None => first_line,
    };
    value
        .trim()
        .trim_matches(|c: char| !is_label_char(c))
        .to_lowercase()
}

/// Letters, digits, and Indic script characters including vowel signs and
/// viramas; the danda and double danda count as punctuation
fn is_label_char(c: char) -> bool {
    c.is_alphanumeric()
        || (('\u{0900}'..='\u{0DFF}').contains(&c) && !matches!(c, '\u{0964}' | '\u{0965}'))
}
