//! Extraction orchestration

use super::names::{dedup_names, normalize_name, NameValidator};
use super::normalize::TextNormalizer;
use super::topics::TopicFilter;
use crate::nlp::{DateParser, PosTagger};
use crate::store::BlacklistStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Structured metadata extracted from one journal entry
///
/// Ephemeral: recomputed per call, optionally cached on a saved entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    /// Encounter-ordered, case-insensitively unique, title-cased names
    pub people: Vec<String>,
    /// Lowercase topic nouns, at most ten
    pub topics: Vec<String>,
    /// Resolved date phrases in document order
    pub dates: Vec<DateTime<Utc>>,
}

impl ExtractedMetadata {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.topics.is_empty() && self.dates.is_empty()
    }

    /// Case-insensitive membership test against extracted people
    pub fn has_person(&self, name: &str) -> bool {
        self.people.iter().any(|p| p.eq_ignore_ascii_case(name))
    }
}

/// Orchestrates normalization, validation, topic and date extraction
///
/// Never returns an error: empty input short-circuits, failing phases
/// degrade to empty partial results, and an unreachable blacklist store
/// disables filtering for that call only.
pub struct MetadataExtractor {
    tagger: Arc<dyn PosTagger>,
    date_parser: Arc<dyn DateParser>,
    normalizer: TextNormalizer,
    validator: NameValidator,
    topic_filter: TopicFilter,
    blacklist: Option<Arc<dyn BlacklistStore>>,
}

impl MetadataExtractor {
    pub fn new(tagger: Arc<dyn PosTagger>, date_parser: Arc<dyn DateParser>) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            validator: NameValidator::new(Arc::clone(&tagger)),
            topic_filter: TopicFilter::new(Arc::clone(&tagger)),
            tagger,
            date_parser,
            blacklist: None,
        }
    }

    /// Apply a blacklist after extraction, before anything is returned
    pub fn with_blacklist(mut self, blacklist: Arc<dyn BlacklistStore>) -> Self {
        self.blacklist = Some(blacklist);
        self
    }

    /// Extract `{people, topics, dates}` from free-form entry text
    pub async fn extract(&self, text: &str) -> ExtractedMetadata {
        if text.trim().is_empty() {
            return ExtractedMetadata::default();
        }
        let normalized = self.normalizer.normalize(text);
        if normalized.is_empty() {
            return ExtractedMetadata::default();
        }

        let people = self.extract_people(&normalized).await;
        let mut topics = match self.topic_filter.extract_topics(&normalized).await {
            Ok(topics) => topics,
            Err(e) => {
                warn!(error = %e, "topic extraction degraded to empty");
                Vec::new()
            }
        };
        let dates = match self.date_parser.parse_dates(&normalized).await {
            Ok(dates) => dates,
            Err(e) => {
                warn!(error = %e, "date extraction degraded to empty");
                Vec::new()
            }
        };

        let mut people = self.apply_blacklist(people).await;
        topics = self.apply_blacklist(topics).await;

        // A name is never also a topic
        let people_words: HashSet<String> = people
            .iter()
            .flat_map(|p| p.split_whitespace())
            .map(|w| w.to_lowercase())
            .collect();
        topics.retain(|t| !people_words.contains(t));

        people = dedup_names(people);
        debug!(
            people = people.len(),
            topics = topics.len(),
            dates = dates.len(),
            "extraction complete"
        );
        ExtractedMetadata {
            people,
            topics,
            dates,
        }
    }

    /// Validate every candidate token into the people list
    ///
    /// Candidates are the tagger's bulk person spans (a candidate source,
    /// never trusted directly) followed by every capitalized token.
    async fn extract_people(&self, normalized: &str) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let mut queued: HashSet<String> = HashSet::new();

        match self.tagger.person_spans(normalized).await {
            Ok(spans) => {
                for span in spans {
                    if queued.insert(span.to_lowercase()) {
                        candidates.push(span);
                    }
                }
            }
            Err(e) => warn!(error = %e, "bulk person-span pass degraded"),
        }
        for word in capitalized_tokens(normalized) {
            if queued.insert(word.to_lowercase()) {
                candidates.push(word);
            }
        }

        let mut people: Vec<String> = Vec::new();
        let mut accepted_words: HashSet<String> = HashSet::new();
        for candidate in candidates {
            // Skip single words already covered by an accepted multi-word name
            if !candidate.contains(' ') && accepted_words.contains(&candidate.to_lowercase()) {
                continue;
            }
            if !self.validator.is_valid_name(&candidate, normalized).await {
                continue;
            }
            if let Some(name) = normalize_name(&candidate) {
                for word in name.split_whitespace() {
                    accepted_words.insert(word.to_lowercase());
                }
                people.push(name);
            }
        }
        people
    }

    /// Drop case-insensitive blacklist matches; store failure disables
    /// filtering for this call
    async fn apply_blacklist(&self, items: Vec<String>) -> Vec<String> {
        let Some(blacklist) = &self.blacklist else {
            return items;
        };
        let blocked: HashSet<String> = match blacklist.all() {
            Ok(words) => words.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "blacklist unavailable, filtering skipped");
                return items;
            }
        };
        items
            .into_iter()
            .filter(|item| !blocked.contains(&item.to_lowercase()))
            .collect()
    }
}

/// Capitalized word tokens in document order, punctuation stripped
fn capitalized_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
                .to_string()
        })
        .filter(|w| w.chars().count() > 1)
        .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{LexiconTagger, RelativeDateParser};
    use crate::store::MemoryStore;

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new(
            Arc::new(LexiconTagger::new()),
            Arc::new(RelativeDateParser::new()),
        )
    }

    #[tokio::test]
    async fn empty_input_short_circuits() {
        let meta = extractor().extract("").await;
        assert_eq!(meta, ExtractedMetadata::default());
        let meta = extractor().extract("   \n\t ").await;
        assert!(meta.is_empty());
    }

    #[tokio::test]
    async fn finds_people_and_skips_function_words() {
        let meta = extractor()
            .extract("I met Henry at his house, Sarah was there too.")
            .await;
        assert!(meta.has_person("Henry"));
        assert!(meta.has_person("Sarah"));
        for word in ["his", "there", "too", "house"] {
            assert!(!meta.has_person(word), "{word} leaked into people");
        }
    }

    #[tokio::test]
    async fn no_capitalized_tokens_means_no_people() {
        let meta = extractor()
            .extract("went for a quiet walk around the pond before dinner")
            .await;
        assert!(meta.people.is_empty());
        assert!(meta.topics.contains(&"pond".to_string()));
    }

    #[tokio::test]
    async fn topics_never_overlap_people() {
        let meta = extractor()
            .extract("I met Henry at the garden. The garden party ran late.")
            .await;
        assert!(meta.has_person("Henry"));
        let people_lower: Vec<String> = meta.people.iter().map(|p| p.to_lowercase()).collect();
        for topic in &meta.topics {
            assert!(!people_lower.contains(topic));
        }
    }

    #[tokio::test]
    async fn extraction_is_idempotent() {
        let text = "Talked to Anna about the move yesterday. Coffee with Ben.";
        let first = extractor().extract(text).await;
        let second = extractor().extract(text).await;
        assert_eq!(first.people, second.people);
        assert_eq!(first.topics, second.topics);
    }

    #[tokio::test]
    async fn multi_word_span_does_not_duplicate_its_parts() {
        let meta = extractor().extract("I met Anna Smith downtown.").await;
        assert!(meta.has_person("Anna Smith"));
        assert!(!meta.has_person("Anna"));
        assert!(!meta.has_person("Smith"));
    }

    #[tokio::test]
    async fn blacklisted_words_are_dropped_after_extraction() {
        let store = Arc::new(MemoryStore::new());
        store.add("henry").unwrap();
        store.add("dinner").unwrap();
        let extractor = MetadataExtractor::new(
            Arc::new(LexiconTagger::new()),
            Arc::new(RelativeDateParser::new()),
        )
        .with_blacklist(store);

        let meta = extractor
            .extract("I met Henry and Sarah for dinner by the lake.")
            .await;
        assert!(!meta.has_person("Henry"));
        assert!(meta.has_person("Sarah"));
        assert!(!meta.topics.contains(&"dinner".to_string()));
        assert!(meta.topics.contains(&"lake".to_string()));
    }

    #[tokio::test]
    async fn dates_resolve_in_document_order() {
        let meta = extractor()
            .extract("Dentist yesterday, then planning for 2026-12-01.")
            .await;
        assert_eq!(meta.dates.len(), 2);
    }
}
