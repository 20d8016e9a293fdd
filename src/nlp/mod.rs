//! NLP capability seams
//!
//! The extraction pipeline is built on two external capabilities: a
//! part-of-speech/entity tagger and a natural-language date parser. Both are
//! consumed through narrow async traits so backends can be swapped (or
//! scripted in tests) without touching the pipeline.
//!
//! Built-in implementations:
//!
//! - [`LexiconTagger`]: deterministic lexicon/suffix tagger, good enough to
//!   drive the pipeline standalone
//! - [`RelativeDateParser`]: resolves relative and explicit date phrases
//!   against a reference clock

mod dates;
mod lexicon;
mod tagger;

pub use dates::{DateParseError, DateParser, RelativeDateParser};
pub use lexicon::LexiconTagger;
pub use tagger::{PosTag, PosTagger, TaggedToken, TaggerError, TaggerResult};
