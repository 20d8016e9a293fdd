//! Shared test fakes for integration suites
//!
//! The extraction pipeline is specified against an unreliable tagger, so
//! these fakes let a test script exactly what the tagger claims (or make
//! every capability fail) without any real NLP backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use muse::extract::ExtractedMetadata;
use muse::nlp::{DateParser, PosTag, PosTagger, TaggedToken, TaggerError, TaggerResult};
use muse::store::{
    BlacklistStore, EntryStore, JournalEntry, PromptLedgerStore, StoreError, StoreResult,
};
use muse::PromptUseRecord;
use std::collections::HashMap;
use uuid::Uuid;

/// Tagger driven by a fixed word-to-tag table plus a person-span list
pub struct ScriptedTagger {
    tags: HashMap<String, PosTag>,
    persons: Vec<String>,
}

impl ScriptedTagger {
    pub fn new(entries: &[(&str, PosTag)], persons: &[&str]) -> Self {
        Self {
            tags: entries
                .iter()
                .map(|(w, t)| (w.to_lowercase(), *t))
                .collect(),
            persons: persons.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
                    .to_string()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }

    fn tag_of(&self, word: &str) -> PosTag {
        self.tags
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(PosTag::Noun)
    }
}

#[async_trait]
impl PosTagger for ScriptedTagger {
    async fn tag(&self, text: &str) -> TaggerResult<Vec<TaggedToken>> {
        Ok(Self::words(text)
            .into_iter()
            .map(|w| {
                let tag = self.tag_of(&w);
                TaggedToken::new(w, tag)
            })
            .collect())
    }

    async fn person_spans(&self, text: &str) -> TaggerResult<Vec<String>> {
        let lower = text.to_lowercase();
        Ok(self
            .persons
            .iter()
            .filter(|p| lower.contains(&p.to_lowercase()))
            .cloned()
            .collect())
    }

    async fn noun_phrases(&self, text: &str, exclude: &[PosTag]) -> TaggerResult<Vec<String>> {
        let mut phrases = Vec::new();
        let mut run: Vec<String> = Vec::new();
        let mut excluded = false;
        for word in Self::words(text) {
            let tag = self.tag_of(&word);
            if matches!(tag, PosTag::Noun | PosTag::ProperNoun | PosTag::Person) {
                excluded = excluded || exclude.contains(&tag);
                run.push(word);
            } else {
                if !run.is_empty() && !excluded {
                    phrases.push(run.join(" "));
                }
                run.clear();
                excluded = false;
            }
        }
        if !run.is_empty() && !excluded {
            phrases.push(run.join(" "));
        }
        Ok(phrases)
    }
}

/// Tagger whose every capability fails
pub struct FailingTagger;

#[async_trait]
impl PosTagger for FailingTagger {
    async fn tag(&self, _text: &str) -> TaggerResult<Vec<TaggedToken>> {
        Err(TaggerError::Backend("tagger offline".to_string()))
    }

    async fn person_spans(&self, _text: &str) -> TaggerResult<Vec<String>> {
        Err(TaggerError::Backend("tagger offline".to_string()))
    }

    async fn noun_phrases(&self, _text: &str, _exclude: &[PosTag]) -> TaggerResult<Vec<String>> {
        Err(TaggerError::Backend("tagger offline".to_string()))
    }
}

/// Date parser that always fails
pub struct FailingDateParser;

#[async_trait]
impl DateParser for FailingDateParser {
    async fn parse_dates(
        &self,
        _text: &str,
    ) -> Result<Vec<DateTime<Utc>>, muse::nlp::DateParseError> {
        Err(muse::nlp::DateParseError::Backend(
            "date parser offline".to_string(),
        ))
    }
}

/// Store whose every operation reports unavailability
pub struct FailingStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("store offline".to_string()))
}

impl BlacklistStore for FailingStore {
    fn all(&self) -> StoreResult<Vec<String>> {
        unavailable()
    }
    fn contains(&self, _word: &str) -> StoreResult<bool> {
        unavailable()
    }
    fn add(&self, _word: &str) -> StoreResult<()> {
        unavailable()
    }
    fn remove(&self, _word: &str) -> StoreResult<bool> {
        unavailable()
    }
    fn clear(&self) -> StoreResult<()> {
        unavailable()
    }
}

impl PromptLedgerStore for FailingStore {
    fn get(&self, _prompt_id: Uuid) -> StoreResult<Option<PromptUseRecord>> {
        unavailable()
    }
    fn record_seen(&self, _prompt_id: Uuid, _at: DateTime<Utc>) -> StoreResult<()> {
        unavailable()
    }
    fn mark_permanent(&self, _prompt_id: Uuid, _at: DateTime<Utc>) -> StoreResult<()> {
        unavailable()
    }
    fn all(&self) -> StoreResult<Vec<PromptUseRecord>> {
        unavailable()
    }
}

impl EntryStore for FailingStore {
    fn insert(&self, _entry: &JournalEntry) -> StoreResult<()> {
        unavailable()
    }
    fn get(&self, _id: Uuid) -> StoreResult<Option<JournalEntry>> {
        unavailable()
    }
    fn recent(&self, _limit: usize, _include_drafts: bool) -> StoreResult<Vec<JournalEntry>> {
        unavailable()
    }
    fn since(
        &self,
        _since: DateTime<Utc>,
        _include_drafts: bool,
    ) -> StoreResult<Vec<JournalEntry>> {
        unavailable()
    }
    fn attach_metadata(&self, _id: Uuid, _metadata: &ExtractedMetadata) -> StoreResult<bool> {
        unavailable()
    }
    fn delete(&self, _id: Uuid) -> StoreResult<bool> {
        unavailable()
    }
}
