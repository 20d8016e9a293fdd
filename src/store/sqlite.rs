//! SQLite storage backend

use super::traits::{
    BlacklistStore, EntryStore, JournalEntry, PromptLedgerStore, StoreError, StoreResult,
};
use crate::extract::ExtractedMetadata;
use crate::prompts::{PromptState, PromptUseRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// SQLite-backed implementation of all three store traits
///
/// One database file with tables for entries, the blacklist, and the
/// prompt-use ledger. Thread-safe via an internal mutex on the connection;
/// the deployment model assumes a single active writer, so every operation
/// is one logical read-modify-write under that lock.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                draft INTEGER NOT NULL DEFAULT 0,
                metadata_json TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_entries_created
                ON entries(created_at);

            CREATE TABLE IF NOT EXISTS blacklist (
                word TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS prompt_ledger (
                prompt_id TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                first_seen_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::Malformed(format!("bad timestamp {raw}: {e}")))
    }

    fn parse_uuid(raw: &str) -> StoreResult<Uuid> {
        Uuid::parse_str(raw).map_err(|e| StoreError::Malformed(format!("bad uuid {raw}: {e}")))
    }

    fn row_to_entry(
        id: String,
        content: String,
        created_at: String,
        draft: bool,
        metadata_json: Option<String>,
    ) -> StoreResult<JournalEntry> {
        let metadata = match metadata_json {
            Some(json) => Some(serde_json::from_str::<ExtractedMetadata>(&json)?),
            None => None,
        };
        Ok(JournalEntry {
            id: Self::parse_uuid(&id)?,
            content,
            created_at: Self::parse_timestamp(&created_at)?,
            draft,
            metadata,
        })
    }
}

impl BlacklistStore for SqliteStore {
    fn all(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT word FROM blacklist ORDER BY word")?;
        let words = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words)
    }

    fn contains(&self, word: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let found: Option<String> = conn
            .query_row(
                "SELECT word FROM blacklist WHERE word = ?1",
                params![word.trim().to_lowercase()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn add(&self, word: &str) -> StoreResult<()> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Ok(());
        }
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO blacklist (word) VALUES (?1)",
            params![word],
        )?;
        Ok(())
    }

    fn remove(&self, word: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM blacklist WHERE word = ?1",
            params![word.trim().to_lowercase()],
        )?;
        Ok(changed > 0)
    }

    fn clear(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM blacklist", [])?;
        Ok(())
    }
}

impl PromptLedgerStore for SqliteStore {
    fn get(&self, prompt_id: Uuid) -> StoreResult<Option<PromptUseRecord>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT state, first_seen_at FROM prompt_ledger WHERE prompt_id = ?1",
                params![prompt_id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((state, first_seen_at)) = row else {
            return Ok(None);
        };
        let state = PromptState::parse(&state)
            .ok_or_else(|| StoreError::Malformed(format!("unknown ledger state {state}")))?;
        Ok(Some(PromptUseRecord {
            prompt_id,
            state,
            first_seen_at: Self::parse_timestamp(&first_seen_at)?,
        }))
    }

    fn record_seen(&self, prompt_id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO prompt_ledger (prompt_id, state, first_seen_at)
             VALUES (?1, ?2, ?3)",
            params![
                prompt_id.to_string(),
                PromptState::Available.as_str(),
                at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn mark_permanent(&self, prompt_id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        // Insert if unseen, then promote; first sighting is preserved and an
        // already-permanent record is a no-op.
        conn.execute(
            "INSERT OR IGNORE INTO prompt_ledger (prompt_id, state, first_seen_at)
             VALUES (?1, ?2, ?3)",
            params![
                prompt_id.to_string(),
                PromptState::Available.as_str(),
                at.to_rfc3339()
            ],
        )?;
        conn.execute(
            "UPDATE prompt_ledger SET state = ?2 WHERE prompt_id = ?1",
            params![
                prompt_id.to_string(),
                PromptState::PermanentlyUsed.as_str()
            ],
        )?;
        Ok(())
    }

    fn all(&self) -> StoreResult<Vec<PromptUseRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT prompt_id, state, first_seen_at FROM prompt_ledger")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (id, state, first_seen_at) in rows {
            let state = PromptState::parse(&state)
                .ok_or_else(|| StoreError::Malformed(format!("unknown ledger state {state}")))?;
            records.push(PromptUseRecord {
                prompt_id: Self::parse_uuid(&id)?,
                state,
                first_seen_at: Self::parse_timestamp(&first_seen_at)?,
            });
        }
        Ok(records)
    }
}

impl EntryStore for SqliteStore {
    fn insert(&self, entry: &JournalEntry) -> StoreResult<()> {
        let metadata_json = entry
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO entries (id, content, created_at, draft, metadata_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id.to_string(),
                entry.content,
                entry.created_at.to_rfc3339(),
                entry.draft,
                metadata_json
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: Uuid) -> StoreResult<Option<JournalEntry>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<(String, String, String, bool, Option<String>)> = conn
            .query_row(
                "SELECT id, content, created_at, draft, metadata_json
                 FROM entries WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;
        drop(conn);
        row.map(|(id, content, created_at, draft, metadata_json)| {
            Self::row_to_entry(id, content, created_at, draft, metadata_json)
        })
        .transpose()
    }

    fn recent(&self, limit: usize, include_drafts: bool) -> StoreResult<Vec<JournalEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, content, created_at, draft, metadata_json FROM entries
             WHERE (?1 OR draft = 0)
             ORDER BY created_at DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![include_drafts, limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);
        rows.into_iter()
            .map(|(id, content, created_at, draft, metadata_json)| {
                Self::row_to_entry(id, content, created_at, draft, metadata_json)
            })
            .collect()
    }

    fn since(&self, since: DateTime<Utc>, include_drafts: bool) -> StoreResult<Vec<JournalEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, content, created_at, draft, metadata_json FROM entries
             WHERE (?1 OR draft = 0) AND created_at >= ?2
             ORDER BY created_at DESC",
        )?;
        let rows = stmt
            .query_map(params![include_drafts, since.to_rfc3339()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);
        rows.into_iter()
            .map(|(id, content, created_at, draft, metadata_json)| {
                Self::row_to_entry(id, content, created_at, draft, metadata_json)
            })
            .collect()
    }

    fn attach_metadata(&self, id: Uuid, metadata: &ExtractedMetadata) -> StoreResult<bool> {
        let json = serde_json::to_string(metadata)?;
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE entries SET metadata_json = ?2 WHERE id = ?1",
            params![id.to_string(), json],
        )?;
        Ok(changed > 0)
    }

    fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM entries WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn entries_round_trip_with_metadata() {
        let store = SqliteStore::open_in_memory().unwrap();
        let metadata = ExtractedMetadata {
            people: vec!["Sarah".to_string()],
            topics: vec!["garden".to_string()],
            dates: vec![Utc::now()],
        };
        let entry = JournalEntry::new("Met Sarah in the garden.").with_metadata(metadata.clone());
        store.insert(&entry).unwrap();

        let loaded = EntryStore::get(&store, entry.id).unwrap().unwrap();
        assert_eq!(loaded.content, entry.content);
        assert_eq!(loaded.metadata.unwrap().people, metadata.people);
    }

    #[test]
    fn recent_orders_newest_first_and_skips_drafts() {
        let store = SqliteStore::open_in_memory().unwrap();
        let older = JournalEntry::new("older").with_created_at(Utc::now() - Duration::days(2));
        let newer = JournalEntry::new("newer");
        let draft = JournalEntry::new("draft").with_draft(true);
        store.insert(&older).unwrap();
        store.insert(&newer).unwrap();
        store.insert(&draft).unwrap();

        let recent = store.recent(10, false).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "newer");

        let with_drafts = store.recent(10, true).unwrap();
        assert_eq!(with_drafts.len(), 3);
    }

    #[test]
    fn since_filters_by_timestamp() {
        let store = SqliteStore::open_in_memory().unwrap();
        let old = JournalEntry::new("old").with_created_at(Utc::now() - Duration::days(20));
        let fresh = JournalEntry::new("fresh").with_created_at(Utc::now() - Duration::days(1));
        store.insert(&old).unwrap();
        store.insert(&fresh).unwrap();

        let window = store.since(Utc::now() - Duration::days(7), false).unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].content, "fresh");
    }

    #[test]
    fn ledger_mark_permanent_preserves_first_sighting() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = Uuid::new_v4();
        let first = Utc::now() - Duration::days(4);
        store.record_seen(id, first).unwrap();
        store.mark_permanent(id, Utc::now()).unwrap();
        store.mark_permanent(id, Utc::now()).unwrap();

        let record = PromptLedgerStore::get(&store, id).unwrap().unwrap();
        assert_eq!(record.state, PromptState::PermanentlyUsed);
        assert_eq!(record.first_seen_at.timestamp(), first.timestamp());
    }

    #[test]
    fn blacklist_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muse.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.add("Sarah").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert!(store.contains("sarah").unwrap());
        assert_eq!(
            BlacklistStore::all(&store).unwrap(),
            vec!["sarah".to_string()]
        );
    }

    #[test]
    fn attach_metadata_reports_missing_entry() {
        let store = SqliteStore::open_in_memory().unwrap();
        let attached = store
            .attach_metadata(Uuid::new_v4(), &ExtractedMetadata::default())
            .unwrap();
        assert!(!attached);
    }
}
