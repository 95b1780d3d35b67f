//! Trusted-source registry and credibility lookup
//!
//! The registry is loaded once (built-in table or configuration override) and
//! is read-only afterwards. Credibility scores are copied into each
//! [`crate::SourceReference`] at verification time, so editing the registry
//! never changes stored results.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Credibility used for URLs whose domain is not in the registry
pub const DEFAULT_URL_CREDIBILITY: u8 = 60;

/// Errors raised by registry construction and lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name not present in the registry (an invariant violation: sources are
    /// only ever drawn from the registry)
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// Two entries share a name
    #[error("Duplicate source name: {0}")]
    DuplicateSource(String),

    /// Credibility outside [0, 100]
    #[error("Credibility for {name} out of range: {score}")]
    InvalidCredibility {
        /// Source name
        name: String,
        /// Offending score
        score: u8,
    },

    /// No entries at all
    #[error("Source registry is empty")]
    Empty,
}

/// Kind of organisation behind a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceCategory {
    /// Government body or official bulletin
    Government,
    /// Dedicated fact-checking organisation
    FactChecker,
    /// News agency
    WireService,
    /// Newspaper, broadcaster, or news site
    NewsOutlet,
    /// Outlet with a documented partisan slant
    Partisan,
}

impl SourceCategory {
    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Government => "government",
            SourceCategory::FactChecker => "fact-checker",
            SourceCategory::WireService => "wire-service",
            SourceCategory::NewsOutlet => "news-outlet",
            SourceCategory::Partisan => "partisan",
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One trusted source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Display name, also used in stance prompts
    pub name: String,
    /// Registrable domain, e.g. `altnews.in`
    pub domain: String,
    /// Base credibility [0, 100]
    pub credibility: u8,
    /// Organisation kind
    pub category: SourceCategory,
    /// Topics the source covers well
    #[serde(default)]
    pub specializations: Vec<String>,
}

impl SourceEntry {
    fn builtin(
        name: &str,
        domain: &str,
        credibility: u8,
        category: SourceCategory,
        specializations: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            domain: domain.to_string(),
            credibility,
            category,
            specializations: specializations.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Reputation label for this entry's credibility
    pub fn reputation(&self) -> &'static str {
        reputation(self.credibility)
    }
}

/// Reputation label for a credibility score
///
/// # Examples
///
/// ```
/// use satya_domain::reputation;
///
/// assert_eq!(reputation(95), "Highly Trusted");
/// assert_eq!(reputation(72), "Trusted");
/// assert_eq!(reputation(50), "Moderate");
/// assert_eq!(reputation(45), "Questionable");
/// ```
pub fn reputation(score: u8) -> &'static str {
    match score {
        85.. => "Highly Trusted",
        70..=84 => "Trusted",
        50..=69 => "Moderate",
        _ => "Questionable",
    }
}

/// Immutable table of trusted sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    entries: Vec<SourceEntry>,
}

impl SourceRegistry {
    /// Build a registry from explicit entries
    ///
    /// Rejects empty tables, duplicate names (case-insensitive) and scores
    /// above 100.
    pub fn from_entries(entries: Vec<SourceEntry>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.credibility > 100 {
                return Err(RegistryError::InvalidCredibility {
                    name: entry.name.clone(),
                    score: entry.credibility,
                });
            }
            if !seen.insert(entry.name.to_lowercase()) {
                return Err(RegistryError::DuplicateSource(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in table of Indian government bodies, fact-checkers, wire
    /// services and outlets
    pub fn builtin() -> Self {
        use SourceCategory::*;
        Self {
            entries: vec![
                SourceEntry::builtin(
                    "PIB Fact Check",
                    "factcheck.pib.gov.in",
                    95,
                    Government,
                    &["Government", "Politics", "Health", "General"],
                ),
                SourceEntry::builtin(
                    "Press Information Bureau",
                    "pib.gov.in",
                    95,
                    Government,
                    &["Government", "General"],
                ),
                SourceEntry::builtin(
                    "Reserve Bank of India",
                    "rbi.org.in",
                    95,
                    Government,
                    &["Finance", "Banking", "Economy"],
                ),
                SourceEntry::builtin(
                    "Ministry of Health and Family Welfare",
                    "mohfw.gov.in",
                    95,
                    Government,
                    &["Health", "Medical", "COVID-19"],
                ),
                SourceEntry::builtin(
                    "Election Commission of India",
                    "eci.gov.in",
                    95,
                    Government,
                    &["Elections", "Politics", "Democracy"],
                ),
                SourceEntry::builtin(
                    "MyGov",
                    "mygov.in",
                    90,
                    Government,
                    &["Government", "Schemes"],
                ),
                SourceEntry::builtin(
                    "Alt News",
                    "altnews.in",
                    90,
                    FactChecker,
                    &["Politics", "Social Media", "Religion"],
                ),
                SourceEntry::builtin(
                    "BoomLive",
                    "boomlive.in",
                    90,
                    FactChecker,
                    &["Politics", "Health", "Technology"],
                ),
                SourceEntry::builtin(
                    "PTI",
                    "ptinews.com",
                    88,
                    WireService,
                    &["General News", "Breaking News"],
                ),
                SourceEntry::builtin(
                    "The Hindu",
                    "thehindu.com",
                    85,
                    NewsOutlet,
                    &["Politics", "Economy", "General News"],
                ),
                SourceEntry::builtin(
                    "The Quint",
                    "thequint.com",
                    82,
                    NewsOutlet,
                    &["General News", "Fact Check"],
                ),
                SourceEntry::builtin(
                    "The Indian Express",
                    "indianexpress.com",
                    82,
                    NewsOutlet,
                    &["Politics", "General News"],
                ),
                SourceEntry::builtin(
                    "India Today",
                    "indiatoday.in",
                    80,
                    NewsOutlet,
                    &["General News", "Fact Check"],
                ),
                SourceEntry::builtin("NDTV", "ndtv.com", 80, NewsOutlet, &["General News"]),
                SourceEntry::builtin(
                    "Hindustan Times",
                    "hindustantimes.com",
                    78,
                    NewsOutlet,
                    &["General News"],
                ),
                SourceEntry::builtin(
                    "The Times of India",
                    "timesofindia.indiatimes.com",
                    75,
                    NewsOutlet,
                    &["General News"],
                ),
                SourceEntry::builtin("OpIndia", "opindia.com", 50, Partisan, &["Politics"]),
                SourceEntry::builtin("Postcard News", "postcard.news", 45, Partisan, &["Politics"]),
            ],
        }
    }

    /// Entries in registry order
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries (never true for a constructed registry)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name (case-insensitive)
    pub fn lookup(&self, name: &str) -> Result<&SourceEntry, RegistryError> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RegistryError::UnknownSource(name.to_string()))
    }

    /// Credibility score for a registered source
    pub fn credibility(&self, name: &str) -> Result<u8, RegistryError> {
        self.lookup(name).map(|entry| entry.credibility)
    }

    /// Entries sorted by credibility, highest first (ties keep registry order)
    pub fn sorted_by_credibility(&self) -> Vec<&SourceEntry> {
        let mut sorted: Vec<&SourceEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.credibility.cmp(&a.credibility));
        sorted
    }

    /// Heuristic credibility for an arbitrary URL
    ///
    /// Registered domains (and their subdomains) use the registry score, the
    /// most specific domain winning. Otherwise the score comes from the TLD:
    /// `.gov.in` 90, `.edu` 85, `.org`/`.org.in` 75, satire markers 20,
    /// everything else [`DEFAULT_URL_CREDIBILITY`].
    pub fn credibility_for_url(&self, url: &str) -> u8 {
        let domain = domain_from_url(url);

        let registered = self
            .entries
            .iter()
            .filter(|entry| {
                domain == entry.domain || domain.ends_with(&format!(".{}", entry.domain))
            })
            .max_by_key(|entry| entry.domain.len());
        if let Some(entry) = registered {
            return entry.credibility;
        }

        if domain.ends_with(".gov.in") {
            90
        } else if domain.ends_with(".edu") {
            85
        } else if domain.ends_with(".org.in") || domain.ends_with(".org") {
            75
        } else if ["fake", "satire", "parody"].iter().any(|w| domain.contains(w)) {
            20
        } else {
            DEFAULT_URL_CREDIBILITY
        }
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercased host of a URL without `www.` or port
///
/// # Examples
///
/// ```
/// use satya_domain::registry::domain_from_url;
///
/// assert_eq!(domain_from_url("https://www.AltNews.in/some/path"), "altnews.in");
/// assert_eq!(domain_from_url("thehindu.com:443/x"), "thehindu.com");
/// ```
pub fn domain_from_url(url: &str) -> String {
    let trimmed = url.trim();
    let without_scheme = match trimmed.split_once("://") {
        Some((_, rest)) => rest,
        None => trimmed,
    };
    let host_port = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("");
    let host = host_port.rsplit('@').next().unwrap_or(host_port);
    let host = host.split(':').next().unwrap_or(host).to_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}
