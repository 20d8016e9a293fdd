//! Tagger trait defining the part-of-speech capability interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by a tagger backend
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("Tagger backend failed: {0}")]
    Backend(String),

    #[error("Tagger returned malformed output: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tagger operations
pub type TaggerResult<T> = Result<T, TaggerError>;

/// Grammatical/entity classes a tagger can assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosTag {
    Noun,
    ProperNoun,
    Person,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Preposition,
    Conjunction,
    /// Numbers, amounts, quantities
    Value,
}

impl PosTag {
    /// Grammatical function-word classes that can never carry content
    pub fn is_function_word(self) -> bool {
        matches!(
            self,
            PosTag::Pronoun | PosTag::Determiner | PosTag::Preposition | PosTag::Conjunction
        )
    }
}

/// A token with its assigned tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Token text as it appeared in the input
    pub text: String,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: PosTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    /// Case-insensitive comparison against a candidate word
    pub fn matches(&self, word: &str) -> bool {
        self.text.eq_ignore_ascii_case(word)
    }
}

/// Trait for part-of-speech/entity tagger backends
///
/// Backends may be local heuristics or remote NLP services; the pipeline
/// treats them as unreliable on isolated words and layers its own
/// disambiguation on top (see `extract::NameValidator`).
#[async_trait]
pub trait PosTagger: Send + Sync {
    /// Tag every token in the text
    async fn tag(&self, text: &str) -> TaggerResult<Vec<TaggedToken>>;

    /// Bulk person-span detection
    ///
    /// Returns spans (possibly multi-word) the backend believes are person
    /// names. Callers must treat these as candidates, not truth.
    async fn person_spans(&self, text: &str) -> TaggerResult<Vec<String>>;

    /// Noun-phrase extraction with tag-based exclusion
    ///
    /// Returns phrases whose head words are nouns, skipping any phrase that
    /// contains a token tagged with one of `exclude`.
    async fn noun_phrases(&self, text: &str, exclude: &[PosTag]) -> TaggerResult<Vec<String>>;

    /// Tag a single word in isolation
    ///
    /// Default implementation tags the word as a one-token text and returns
    /// the first result.
    async fn tag_word(&self, word: &str) -> TaggerResult<Option<PosTag>> {
        let tokens = self.tag(word).await?;
        Ok(tokens.first().map(|t| t.tag))
    }
}
