//! Topic extraction from noun phrases
//!
//! Topics are single common nouns. The tagger's noun-phrase pass already
//! excludes person/proper-noun phrases, but it habitually mis-tags a few
//! closed classes as nouns, so those are stripped here, and every survivor
//! is re-tagged in isolation to catch a name hiding inside a phrase.

use crate::nlp::{PosTag, PosTagger, TaggerResult};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Hard cap on topics per extraction, first-seen order
const MAX_TOPICS: usize = 10;

/// Minimum surviving word length
const MIN_TOPIC_LEN: usize = 3;

const LINKING_VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "seem", "seems", "seemed", "feel",
    "feels", "felt", "become", "became",
];

/// Pronoun-ish words the tagger tends to mis-tag as nouns
const MISTAGGED_PRONOUNS: &[&str] = &[
    "it", "its", "guy", "guys", "person", "people", "thing", "things", "stuff", "someone",
    "anyone", "everyone", "nobody", "somebody", "everybody", "anything", "something",
    "everything", "one", "ones",
];

/// Adjectives, adverbs and temporal deictics it sometimes calls nouns
const MISTAGGED_MODIFIERS: &[&str] = &[
    "good", "great", "nice", "bad", "fine", "okay", "very", "really", "quite", "today",
    "yesterday", "tomorrow", "tonight", "now", "then", "here", "there", "lot", "lots", "bit",
    "kind", "sort", "way", "time", "times",
];

/// Extracts topic nouns from text via the tagger's noun-phrase pass
pub struct TopicFilter {
    tagger: Arc<dyn PosTagger>,
}

impl TopicFilter {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    /// Extract up to [`MAX_TOPICS`] lowercase topic words in encounter order
    pub async fn extract_topics(&self, text: &str) -> TaggerResult<Vec<String>> {
        let phrases = self
            .tagger
            .noun_phrases(text, &[PosTag::ProperNoun, PosTag::Person])
            .await?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut topics: Vec<String> = Vec::new();

        'words: for word in phrases.iter().flat_map(|p| p.split_whitespace()) {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-');
            if word.chars().count() < MIN_TOPIC_LEN {
                continue;
            }
            let lower = word.to_lowercase();
            if LINKING_VERBS.contains(&lower.as_str())
                || MISTAGGED_PRONOUNS.contains(&lower.as_str())
                || MISTAGGED_MODIFIERS.contains(&lower.as_str())
            {
                continue;
            }
            if seen.contains(&lower) {
                continue;
            }

            // Second pass: re-tag in isolation; a proper-noun/person reading
            // means a name leaked into the phrase.
            match self.tagger.tag_word(word).await {
                Ok(Some(PosTag::ProperNoun | PosTag::Person)) => continue 'words,
                Ok(_) => {}
                Err(e) => debug!(word = %word, error = %e, "isolated re-tag failed"),
            }

            seen.insert(lower.clone());
            topics.push(lower);
            if topics.len() >= MAX_TOPICS {
                break;
            }
        }

        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{LexiconTagger, TaggedToken};
    use async_trait::async_trait;

    #[tokio::test]
    async fn extracts_lowercase_nouns() {
        let filter = TopicFilter::new(Arc::new(LexiconTagger::new()));
        let topics = filter
            .extract_topics("We ate dinner by the lake near the garden")
            .await
            .unwrap();
        assert_eq!(topics, vec!["dinner", "lake", "garden"]);
    }

    #[tokio::test]
    async fn short_words_and_stop_sets_are_removed() {
        let filter = TopicFilter::new(Arc::new(LexiconTagger::new()));
        let topics = filter
            .extract_topics("It was a thing about ox stuff and good coffee")
            .await
            .unwrap();
        assert!(!topics.contains(&"it".to_string()));
        assert!(!topics.contains(&"thing".to_string()));
        assert!(!topics.contains(&"stuff".to_string()));
        assert!(!topics.contains(&"good".to_string()));
        assert!(!topics.contains(&"ox".to_string()));
        assert!(topics.contains(&"coffee".to_string()));
    }

    #[tokio::test]
    async fn caps_to_ten_in_encounter_order() {
        /// Tagger that calls every word a noun
        struct AllNouns;

        #[async_trait]
        impl PosTagger for AllNouns {
            async fn tag(&self, text: &str) -> TaggerResult<Vec<TaggedToken>> {
                Ok(text
                    .split_whitespace()
                    .map(|w| TaggedToken::new(w, PosTag::Noun))
                    .collect())
            }
            async fn person_spans(&self, _text: &str) -> TaggerResult<Vec<String>> {
                Ok(Vec::new())
            }
            async fn noun_phrases(
                &self,
                text: &str,
                _exclude: &[PosTag],
            ) -> TaggerResult<Vec<String>> {
                Ok(vec![text.to_string()])
            }
        }

        let filter = TopicFilter::new(Arc::new(AllNouns));
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliett kilo lima";
        let topics = filter.extract_topics(text).await.unwrap();
        assert_eq!(topics.len(), 10);
        assert_eq!(topics[0], "alpha");
        assert_eq!(topics[9], "juliett");
    }

    #[tokio::test]
    async fn second_pass_drops_hidden_names() {
        let filter = TopicFilter::new(Arc::new(LexiconTagger::new()));
        // "Henry" is in the tagger's given-name lexicon; even if it slipped
        // into a noun phrase it must not become a topic.
        let topics = filter.extract_topics("Henry garden party").await.unwrap();
        assert!(!topics.contains(&"henry".to_string()));
    }
}
