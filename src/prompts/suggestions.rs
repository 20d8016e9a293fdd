//! Display-only topic suggestion chips
//!
//! Suggestions are passive: never interactive, never tracked in the use
//! ledger. The one hard rule is that a suggestion must never be a person's
//! name, from either aggregation window.

use super::generator::{PERSON_WINDOW_DAYS, TOPIC_WINDOW_ENTRIES};
use crate::extract::ExtractedMetadata;
use crate::store::EntryStore;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Default maximum number of suggestion chips
pub const DEFAULT_SUGGESTION_CAP: usize = 8;

/// Fallback shown when no extracted topic survives
const DEFAULT_TOPICS: &[&str] = &[
    "family", "work", "gratitude", "travel", "health", "friends", "food", "weekend",
];

/// A single display-only suggestion chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSuggestion {
    pub word: String,
}

impl TopicSuggestion {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }
}

/// Builds suggestion chips from metadata plus the fresh topic window
pub struct TopicSuggestionBuilder {
    entries: Option<Arc<dyn EntryStore>>,
}

impl Default for TopicSuggestionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicSuggestionBuilder {
    pub fn new() -> Self {
        Self { entries: None }
    }

    pub fn with_entry_store(mut self, entries: Arc<dyn EntryStore>) -> Self {
        self.entries = Some(entries);
        self
    }

    /// Build up to `cap` suggestions, excluding anything that names a person
    pub fn topic_suggestions(
        &self,
        metadata: &ExtractedMetadata,
        cap: usize,
        exclude_names: &[String],
    ) -> Vec<TopicSuggestion> {
        let mut pool: Vec<String> = metadata.topics.clone();
        let mut names: HashSet<String> = metadata
            .people
            .iter()
            .chain(exclude_names)
            .map(|n| n.to_lowercase())
            .collect();

        if let Some(entries) = &self.entries {
            match entries.recent(TOPIC_WINDOW_ENTRIES, false) {
                Ok(window) => {
                    for entry in window {
                        if let Some(meta) = entry.metadata {
                            pool.extend(meta.topics);
                            names.extend(meta.people.iter().map(|p| p.to_lowercase()));
                        }
                    }
                }
                Err(e) => warn!(error = %e, "topic window unavailable"),
            }
            // Names from the wider person window are excluded too
            let cutoff = Utc::now() - Duration::days(PERSON_WINDOW_DAYS);
            match entries.since(cutoff, false) {
                Ok(window) => {
                    for entry in window {
                        if let Some(meta) = entry.metadata {
                            names.extend(meta.people.iter().map(|p| p.to_lowercase()));
                        }
                    }
                }
                Err(e) => warn!(error = %e, "person window unavailable"),
            }
        }

        // Split multi-word names so "Anna Smith" also blocks "anna"
        let name_words: HashSet<String> = names
            .iter()
            .flat_map(|n| n.split_whitespace())
            .map(|w| w.to_string())
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        let survivors: Vec<TopicSuggestion> = pool
            .into_iter()
            .map(|t| t.to_lowercase())
            .filter(|t| !names.contains(t) && !name_words.contains(t))
            .filter(|t| seen.insert(t.clone()))
            .take(cap)
            .map(TopicSuggestion::new)
            .collect();

        if !survivors.is_empty() {
            return survivors;
        }
        DEFAULT_TOPICS
            .iter()
            .filter(|t| !names.contains(**t) && !name_words.contains(**t))
            .take(cap)
            .map(|t| TopicSuggestion::new(*t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntryStore as _, JournalEntry, MemoryStore};

    fn metadata(people: &[&str], topics: &[&str]) -> ExtractedMetadata {
        ExtractedMetadata {
            people: people.iter().map(|s| s.to_string()).collect(),
            topics: topics.iter().map(|s| s.to_string()).collect(),
            dates: Vec::new(),
        }
    }

    #[test]
    fn suggestions_never_overlap_names() {
        let builder = TopicSuggestionBuilder::new();
        let meta = metadata(&["Berry"], &["berry", "garden"]);
        let suggestions = builder.topic_suggestions(&meta, DEFAULT_SUGGESTION_CAP, &[]);
        assert_eq!(suggestions, vec![TopicSuggestion::new("garden")]);
    }

    #[test]
    fn caps_at_requested_size() {
        let builder = TopicSuggestionBuilder::new();
        let topics: Vec<&str> = vec![
            "one1", "two2", "three", "four", "five", "sixx", "seven", "eight", "nine", "tenn",
        ];
        let meta = metadata(&[], &topics);
        assert_eq!(builder.topic_suggestions(&meta, 8, &[]).len(), 8);
    }

    #[test]
    fn falls_back_to_defaults_when_nothing_survives() {
        let builder = TopicSuggestionBuilder::new();
        let suggestions =
            builder.topic_suggestions(&ExtractedMetadata::default(), DEFAULT_SUGGESTION_CAP, &[]);
        assert_eq!(suggestions.len(), DEFAULT_SUGGESTION_CAP);
        assert_eq!(suggestions[0], TopicSuggestion::new("family"));
    }

    #[test]
    fn window_names_block_window_topics() {
        let store = Arc::new(MemoryStore::new());
        let entry = JournalEntry::new("x").with_metadata(metadata(&["River"], &["river", "rain"]));
        store.insert(&entry).unwrap();

        let builder = TopicSuggestionBuilder::new().with_entry_store(store);
        let suggestions =
            builder.topic_suggestions(&ExtractedMetadata::default(), DEFAULT_SUGGESTION_CAP, &[]);
        assert_eq!(suggestions, vec![TopicSuggestion::new("rain")]);
    }

    #[test]
    fn explicit_exclusions_apply() {
        let builder = TopicSuggestionBuilder::new();
        let meta = metadata(&[], &["rain", "stars"]);
        let suggestions = builder.topic_suggestions(&meta, 8, &["Rain".to_string()]);
        assert_eq!(suggestions, vec![TopicSuggestion::new("stars")]);
    }
}
