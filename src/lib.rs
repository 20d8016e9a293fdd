//! Muse: journal metadata extraction and personalized writing prompts
//!
//! Extracts structured information (mentioned people, topics, dates) from
//! free-form journal text and turns it into tone-rendered writing prompts
//! with a managed lifecycle (shown, used, expired, reusable).
//!
//! # Core Concepts
//!
//! - **Extraction**: a deterministic rule-based pipeline over a noisy
//!   part-of-speech tagger; ambiguous name candidates are re-tagged inside
//!   fixed carrier sentences and accepted by vote
//! - **Prompts**: deterministic ids derived from `(entity, kind)` so
//!   regeneration maps onto existing use and expiry state
//! - **Lifecycle**: a prompt inserted into a draft hides until the draft is
//!   saved (terminal) or discarded (available again)
//!
//! # Example
//!
//! ```
//! use muse::{LexiconTagger, MetadataExtractor, RelativeDateParser};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let extractor = MetadataExtractor::new(
//!     Arc::new(LexiconTagger::new()),
//!     Arc::new(RelativeDateParser::new()),
//! );
//! let metadata = extractor.extract("I met Henry at the lake yesterday.").await;
//! assert!(metadata.has_person("Henry"));
//! # });
//! ```

mod engine;
pub mod extract;
pub mod nlp;
pub mod prompts;
pub mod store;

pub use engine::MuseEngine;
pub use extract::{
    ExtractedMetadata, MetadataExtractor, NameValidator, TextNormalizer, TopicFilter,
};
pub use nlp::{
    DateParser, LexiconTagger, PosTag, PosTagger, RelativeDateParser, TaggedToken, TaggerError,
};
pub use prompts::{
    prompt_id, Prompt, PromptGenerator, PromptKind, PromptLifecycleManager, PromptState,
    PromptUseRecord, Tone, TopicSuggestion, TopicSuggestionBuilder,
};
pub use store::{
    BlacklistStore, EntryStore, JournalEntry, MemoryStore, PromptLedgerStore, SqliteStore,
    StoreError, StoreResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
