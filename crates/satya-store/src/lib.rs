//! Satya Storage Layer
//!
//! Implements the `DocumentStore` trait on SQLite.
//!
//! # Architecture
//!
//! - One JSON document per verification (article + result), keyed by article id
//! - One verdict row per claim, written in the same transaction, for stats
//! - Append-only: triggers reject UPDATE and DELETE
//!
//! # Examples
//!
//! ```no_run
//! use satya_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for verification documents
//! ```

#![warn(missing_docs)]

use rusqlite::{params, Connection, OptionalExtension};
use satya_domain::traits::DocumentStore;
use satya_domain::{ArticleId, StoredVerification, Verdict, VerdictCounts, VerificationStats};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A document with this article id already exists
    #[error("Duplicate article: {0}")]
    Duplicate(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Connection mutex was poisoned by a panicking writer
    #[error("Store lock poisoned: {0}")]
    Lock(String),
}

/// SQLite-based implementation of DocumentStore
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one store can be shared across
/// request handlers. Each insert is a single transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use satya_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("satya.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Fetch one document by article id
    pub fn get(&self, article_id: ArticleId) -> Result<Option<StoredVerification>, StoreError> {
        let conn = self.lock()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM verifications WHERE article_id = ?1",
                params![article_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        document
            .map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .transpose()
    }

    /// Number of stored documents
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM verifications", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl DocumentStore for SqliteStore {
    type Error = StoreError;

    fn insert(&self, document: &StoredVerification) -> Result<(), Self::Error> {
        let article_id = document.article.id.to_string();
        let json = serde_json::to_string(document)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let exists: bool = tx
            .query_row(
                "SELECT 1 FROM verifications WHERE article_id = ?1",
                params![&article_id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Duplicate(article_id));
        }

        tx.execute(
            "INSERT INTO verifications (article_id, input_type, detected_language, created_at_ms, document)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &article_id,
                document.article.input_type.as_str(),
                document.article.detected_language.name(),
                document.article.created_at.timestamp_millis(),
                &json,
            ],
        )?;

        for claim in &document.result.claims {
            tx.execute(
                "INSERT INTO claim_verdicts (claim_id, article_id, verdict, confidence)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    claim.id.to_string(),
                    &article_id,
                    claim.verdict.as_str(),
                    i64::from(claim.confidence),
                ],
            )?;
        }

        tx.commit()?;
        debug!(
            article_id = %article_id,
            claims = document.result.claims.len(),
            "Stored verification document"
        );
        Ok(())
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<StoredVerification>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT document FROM verifications
             ORDER BY created_at_ms DESC, rowid DESC
             LIMIT ?1",
        )?;

        let documents = stmt
            .query_map(params![limit as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        documents
            .iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    fn aggregate_counts(&self) -> Result<VerificationStats, Self::Error> {
        let conn = self.lock()?;

        let total_articles: i64 =
            conn.query_row("SELECT COUNT(*) FROM verifications", [], |row| row.get(0))?;

        let mut stmt =
            conn.prepare("SELECT verdict, COUNT(*) FROM claim_verdicts GROUP BY verdict")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut distribution = VerdictCounts::default();
        for (verdict, count) in rows {
            let verdict: Verdict = verdict.parse().map_err(StoreError::InvalidData)?;
            distribution.add(verdict, count as u64);
        }

        Ok(VerificationStats {
            total_articles: total_articles as u64,
            total_claims: distribution.total(),
            verdict_distribution: distribution,
        })
    }
}
