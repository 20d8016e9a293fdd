//! Metadata extraction pipeline
//!
//! Turns free-form journal text into structured `{people, topics, dates}`
//! metadata. The pipeline is deterministic and rule-based: normalize markup,
//! gather name candidates (capitalized tokens plus the tagger's bulk person
//! spans), validate each through [`NameValidator`]'s contextual re-tagging
//! votes, extract topic nouns through [`TopicFilter`], resolve date phrases,
//! then apply the blacklist. Every phase degrades independently: a tagger
//! failure empties that phase's output and the rest continue.

mod extractor;
mod names;
mod normalize;
mod topics;

pub use extractor::{ExtractedMetadata, MetadataExtractor};
pub use names::{dedup_names, normalize_name, NameValidator};
pub use normalize::TextNormalizer;
pub use topics::TopicFilter;
