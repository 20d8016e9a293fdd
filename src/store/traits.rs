//! Store trait definitions

use crate::extract::ExtractedMetadata;
use crate::prompts::PromptUseRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed stored value: {0}")]
    Malformed(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A journal entry as persisted by the surrounding application
///
/// Metadata is optional by design: the save path never blocks on
/// extraction, so an entry may be persisted bare and have metadata merged
/// in asynchronously once ready.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub draft: bool,
    pub metadata: Option<ExtractedMetadata>,
}

impl JournalEntry {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            created_at: Utc::now(),
            draft: false,
            metadata: None,
        }
    }

    pub fn with_draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_metadata(mut self, metadata: ExtractedMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Case-insensitive blocked-word list, persisted externally
///
/// Words are normalized (trimmed, lowercased) on the way in; `all()`
/// returns the normalized forms.
pub trait BlacklistStore: Send + Sync {
    fn all(&self) -> StoreResult<Vec<String>>;
    fn contains(&self, word: &str) -> StoreResult<bool>;
    fn add(&self, word: &str) -> StoreResult<()>;
    fn remove(&self, word: &str) -> StoreResult<bool>;
    fn clear(&self) -> StoreResult<()>;
}

/// Persisted prompt-use ledger
pub trait PromptLedgerStore: Send + Sync {
    fn get(&self, prompt_id: Uuid) -> StoreResult<Option<PromptUseRecord>>;

    /// Record the first time a prompt is surfaced; later calls keep the
    /// original record untouched
    fn record_seen(&self, prompt_id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    /// Transition a prompt to permanently used; idempotent, and an already
    /// permanent record is left unchanged
    fn mark_permanent(&self, prompt_id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    fn all(&self) -> StoreResult<Vec<PromptUseRecord>>;
}

/// Supplies the rolling window of prior entries and accepts metadata updates
pub trait EntryStore: Send + Sync {
    fn insert(&self, entry: &JournalEntry) -> StoreResult<()>;

    fn get(&self, id: Uuid) -> StoreResult<Option<JournalEntry>>;

    /// Most recent entries first, capped at `limit`
    fn recent(&self, limit: usize, include_drafts: bool) -> StoreResult<Vec<JournalEntry>>;

    /// Entries created at or after `since`, most recent first
    fn since(&self, since: DateTime<Utc>, include_drafts: bool) -> StoreResult<Vec<JournalEntry>>;

    /// Merge extraction output into a stored entry
    ///
    /// Returns false when the entry no longer exists; the caller must drop
    /// the metadata rather than resurrect the entry.
    fn attach_metadata(&self, id: Uuid, metadata: &ExtractedMetadata) -> StoreResult<bool>;

    fn delete(&self, id: Uuid) -> StoreResult<bool>;
}
