//! In-memory store for tests and ephemeral runs

use super::traits::{
    BlacklistStore, EntryStore, JournalEntry, PromptLedgerStore, StoreResult,
};
use crate::extract::ExtractedMetadata;
use crate::prompts::{PromptState, PromptUseRecord};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use uuid::Uuid;

/// HashMap-backed implementation of all three store traits
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<Uuid, JournalEntry>>,
    blacklist: Mutex<BTreeSet<String>>,
    ledger: Mutex<HashMap<Uuid, PromptUseRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlacklistStore for MemoryStore {
    fn all(&self) -> StoreResult<Vec<String>> {
        Ok(self.blacklist.lock().unwrap().iter().cloned().collect())
    }

    fn contains(&self, word: &str) -> StoreResult<bool> {
        Ok(self
            .blacklist
            .lock()
            .unwrap()
            .contains(&word.trim().to_lowercase()))
    }

    fn add(&self, word: &str) -> StoreResult<()> {
        let word = word.trim().to_lowercase();
        if !word.is_empty() {
            self.blacklist.lock().unwrap().insert(word);
        }
        Ok(())
    }

    fn remove(&self, word: &str) -> StoreResult<bool> {
        Ok(self
            .blacklist
            .lock()
            .unwrap()
            .remove(&word.trim().to_lowercase()))
    }

    fn clear(&self) -> StoreResult<()> {
        self.blacklist.lock().unwrap().clear();
        Ok(())
    }
}

impl PromptLedgerStore for MemoryStore {
    fn get(&self, prompt_id: Uuid) -> StoreResult<Option<PromptUseRecord>> {
        Ok(self.ledger.lock().unwrap().get(&prompt_id).cloned())
    }

    fn record_seen(&self, prompt_id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        self.ledger
            .lock()
            .unwrap()
            .entry(prompt_id)
            .or_insert_with(|| PromptUseRecord::seen(prompt_id, at));
        Ok(())
    }

    fn mark_permanent(&self, prompt_id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut ledger = self.ledger.lock().unwrap();
        let record = ledger
            .entry(prompt_id)
            .or_insert_with(|| PromptUseRecord::seen(prompt_id, at));
        record.state = PromptState::PermanentlyUsed;
        Ok(())
    }

    fn all(&self) -> StoreResult<Vec<PromptUseRecord>> {
        Ok(self.ledger.lock().unwrap().values().cloned().collect())
    }
}

impl EntryStore for MemoryStore {
    fn insert(&self, entry: &JournalEntry) -> StoreResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(entry.id, entry.clone());
        Ok(())
    }

    fn get(&self, id: Uuid) -> StoreResult<Option<JournalEntry>> {
        Ok(self.entries.lock().unwrap().get(&id).cloned())
    }

    fn recent(&self, limit: usize, include_drafts: bool) -> StoreResult<Vec<JournalEntry>> {
        let mut entries: Vec<JournalEntry> = self
            .entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| include_drafts || !e.draft)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }

    fn since(&self, since: DateTime<Utc>, include_drafts: bool) -> StoreResult<Vec<JournalEntry>> {
        let mut entries: Vec<JournalEntry> = self
            .entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| (include_drafts || !e.draft) && e.created_at >= since)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    fn attach_metadata(&self, id: Uuid, metadata: &ExtractedMetadata) -> StoreResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(&id) {
            Some(entry) => {
                entry.metadata = Some(metadata.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.entries.lock().unwrap().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blacklist_normalizes_case() {
        let store = MemoryStore::new();
        store.add("  Sarah ").unwrap();
        assert!(store.contains("sarah").unwrap());
        assert!(store.contains("SARAH").unwrap());
        assert!(store.remove("Sarah").unwrap());
        assert!(!store.contains("sarah").unwrap());
    }

    #[test]
    fn record_seen_keeps_first_sighting() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let first = Utc::now() - chrono::Duration::days(3);
        store.record_seen(id, first).unwrap();
        store.record_seen(id, Utc::now()).unwrap();
        let record = PromptLedgerStore::get(&store, id).unwrap().unwrap();
        assert_eq!(record.first_seen_at, first);
        assert_eq!(record.state, PromptState::Available);
    }

    #[test]
    fn attach_metadata_to_missing_entry_reports_false() {
        let store = MemoryStore::new();
        let attached = store
            .attach_metadata(Uuid::new_v4(), &ExtractedMetadata::default())
            .unwrap();
        assert!(!attached);
    }
}
