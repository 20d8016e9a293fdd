//! Personalized writing prompts
//!
//! Turns extracted metadata into tone-rendered prompts and manages their
//! lifecycle so a user is never shown a stale or already-used suggestion.
//!
//! - [`PromptGenerator`]: windowed candidate pools, tone templates, stable
//!   deterministic prompt ids
//! - [`PromptLifecycleManager`]: available / temporarily-used /
//!   permanently-used / expired state over a persisted ledger
//! - [`TopicSuggestionBuilder`]: display-only topic chips

mod generator;
mod lifecycle;
mod suggestions;

pub use generator::{
    prompt_id, Prompt, PromptGenerator, PromptKind, Tone, DEFAULT_EXPIRY_DAYS,
    PERSON_WINDOW_DAYS, TOPIC_WINDOW_ENTRIES,
};
pub use lifecycle::{PromptLifecycleManager, PromptState, PromptUseRecord};
pub use suggestions::{TopicSuggestion, TopicSuggestionBuilder, DEFAULT_SUGGESTION_CAP};
