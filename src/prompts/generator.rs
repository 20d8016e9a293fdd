//! Prompt generation from metadata windows
//!
//! Two aggregation windows on purpose: person prompts draw on the last
//! seven days of saved entries (longer memory helps continuity), topic
//! prompts on only the last three entries (kept deliberately fresh). Prompt
//! ids are derived from the entity, never random, so regeneration maps onto
//! existing use and expiry state.

use super::lifecycle::PromptLifecycleManager;
use crate::extract::ExtractedMetadata;
use crate::store::{BlacklistStore, EntryStore};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Days of saved entries feeding the person prompt pool
pub const PERSON_WINDOW_DAYS: i64 = 7;

/// Number of most-recent saved entries feeding the topic pool
pub const TOPIC_WINDOW_ENTRIES: usize = 3;

/// Default age threshold after which an unseen-again prompt expires
pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Namespace for deterministic prompt ids
const PROMPT_NAMESPACE: Uuid = Uuid::from_u128(0x8d3f1c6a_4b2e_4f7d_9a15_c0de2a7b9e41);

/// Entity-independent prompts, shown only when nothing personalized
/// survives filtering: (stable key, cozy text, neutral text)
const FILLERS: &[(&str, &str, &str)] = &[
    (
        "filler-smile",
        "What made you smile today?",
        "List three notable things from today.",
    ),
    (
        "filler-day",
        "How did today feel, start to finish?",
        "Summarize your day.",
    ),
    (
        "filler-mind",
        "What has been sitting on your mind lately?",
        "What is on your mind?",
    ),
];

/// What kind of entity a prompt was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Person,
    Topic,
    Date,
    Filler,
}

impl PromptKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptKind::Person => "person",
            PromptKind::Topic => "topic",
            PromptKind::Date => "date",
            PromptKind::Filler => "filler",
        }
    }
}

/// Rendering tone for prompt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Cozy,
    Neutral,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Cozy => "cozy",
            Tone::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cozy" => Some(Tone::Cozy),
            "neutral" => Some(Tone::Neutral),
            _ => None,
        }
    }
}

/// A tone-rendered writing prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Stable: derived from entity text and kind, identical across tones
    pub id: Uuid,
    pub text: String,
    pub kind: PromptKind,
    pub created_at: DateTime<Utc>,
}

impl Prompt {
    /// Render a prompt for an entity under the given tone
    pub fn render(kind: PromptKind, entity: &str, tone: Tone) -> Self {
        Self {
            id: prompt_id(kind, entity),
            text: render_text(kind, entity, tone),
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Deterministic prompt id from `(entity, kind)`
///
/// Same entity, same kind: same id, across independent calls and tones.
pub fn prompt_id(kind: PromptKind, entity: &str) -> Uuid {
    let key = format!("{}:{}", kind.as_str(), entity.trim().to_lowercase());
    Uuid::new_v5(&PROMPT_NAMESPACE, key.as_bytes())
}

fn render_text(kind: PromptKind, entity: &str, tone: Tone) -> String {
    match (kind, tone) {
        (PromptKind::Person, Tone::Cozy) => format!("How is {entity} doing these days?"),
        (PromptKind::Person, Tone::Neutral) => format!("Write an update about {entity}."),
        (PromptKind::Topic, Tone::Cozy) => {
            format!("You wrote about {entity} recently. How is that going?")
        }
        (PromptKind::Topic, Tone::Neutral) => format!("Write more about {entity}."),
        (PromptKind::Date, Tone::Cozy) => format!("Think back to {entity}. What stands out now?"),
        (PromptKind::Date, Tone::Neutral) => format!("Describe what happened on {entity}."),
        (PromptKind::Filler, _) => FILLERS
            .iter()
            .find(|(key, _, _)| *key == entity)
            .map(|(_, cozy, neutral)| match tone {
                Tone::Cozy => (*cozy).to_string(),
                Tone::Neutral => (*neutral).to_string(),
            })
            .unwrap_or_else(|| "What is on your mind today?".to_string()),
    }
}

/// Generates prompts from metadata plus the rolling entry windows
///
/// Every collaborator is optional; a missing or failing store shrinks the
/// candidate pool (or skips a filter) instead of failing the call.
pub struct PromptGenerator {
    entries: Option<Arc<dyn EntryStore>>,
    blacklist: Option<Arc<dyn BlacklistStore>>,
    lifecycle: Option<Arc<PromptLifecycleManager>>,
    expiry_days: i64,
}

impl Default for PromptGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptGenerator {
    pub fn new() -> Self {
        Self {
            entries: None,
            blacklist: None,
            lifecycle: None,
            expiry_days: DEFAULT_EXPIRY_DAYS,
        }
    }

    pub fn with_entry_store(mut self, entries: Arc<dyn EntryStore>) -> Self {
        self.entries = Some(entries);
        self
    }

    pub fn with_blacklist(mut self, blacklist: Arc<dyn BlacklistStore>) -> Self {
        self.blacklist = Some(blacklist);
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: Arc<PromptLifecycleManager>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn with_expiry_days(mut self, days: i64) -> Self {
        self.expiry_days = days;
        self
    }

    /// Generate up to `count` prompts for the given metadata and tone
    ///
    /// Personalized prompts take priority (person > topic > date); fillers
    /// appear only when the personalized pool is empty after filtering and
    /// there was source data to begin with.
    pub fn generate_prompts(
        &self,
        metadata: &ExtractedMetadata,
        tone: Tone,
        count: usize,
        source_text: Option<&str>,
    ) -> Vec<Prompt> {
        if count == 0 {
            return Vec::new();
        }

        let (mut people, mut topics) = self.pooled_candidates(metadata);
        let had_source = !people.is_empty()
            || !topics.is_empty()
            || !metadata.dates.is_empty()
            || source_text.is_some_and(|t| !t.trim().is_empty());

        if let Some(blocked) = self.blocked_words() {
            people.retain(|p| !blocked.contains(&p.to_lowercase()));
            topics.retain(|t| !blocked.contains(&t.to_lowercase()));
        }

        let mut prompts: Vec<Prompt> = Vec::new();
        prompts.extend(
            people
                .iter()
                .map(|p| Prompt::render(PromptKind::Person, p, tone)),
        );
        prompts.extend(
            topics
                .iter()
                .map(|t| Prompt::render(PromptKind::Topic, t, tone)),
        );
        prompts.extend(metadata.dates.iter().map(|d| {
            Prompt::render(PromptKind::Date, &d.date_naive().to_string(), tone)
        }));

        if let Some(lifecycle) = &self.lifecycle {
            prompts = lifecycle.filter_used_prompts(prompts);
            prompts = lifecycle.filter_expired_prompts(prompts, self.expiry_days);
        }
        prompts.truncate(count);

        if prompts.is_empty() {
            if !had_source {
                return Vec::new();
            }
            prompts = Self::fillers(count, tone);
        } else if let Some(lifecycle) = &self.lifecycle {
            for prompt in &prompts {
                lifecycle.record_seen(prompt.id);
            }
        }
        prompts
    }

    /// Entity-independent fallback prompts, exempt from use/expiry tracking
    pub fn fillers(count: usize, tone: Tone) -> Vec<Prompt> {
        FILLERS
            .iter()
            .take(count.max(1))
            .map(|(key, _, _)| Prompt::render(PromptKind::Filler, key, tone))
            .collect()
    }

    /// Merge current metadata with the two aggregation windows
    fn pooled_candidates(&self, metadata: &ExtractedMetadata) -> (Vec<String>, Vec<String>) {
        let mut people = metadata.people.clone();
        let mut topics = metadata.topics.clone();

        if let Some(entries) = &self.entries {
            let cutoff = Utc::now() - Duration::days(PERSON_WINDOW_DAYS);
            match entries.since(cutoff, false) {
                Ok(window) => {
                    for entry in window {
                        if let Some(meta) = entry.metadata {
                            people.extend(meta.people);
                        }
                    }
                }
                Err(e) => warn!(error = %e, "person window unavailable"),
            }
            match entries.recent(TOPIC_WINDOW_ENTRIES, false) {
                Ok(window) => {
                    for entry in window {
                        if let Some(meta) = entry.metadata {
                            topics.extend(meta.topics);
                        }
                    }
                }
                Err(e) => warn!(error = %e, "topic window unavailable"),
            }
        }

        (dedup_ci(people), dedup_ci(topics))
    }

    fn blocked_words(&self) -> Option<HashSet<String>> {
        let blacklist = self.blacklist.as_ref()?;
        match blacklist.all() {
            Ok(words) => Some(words.into_iter().collect()),
            Err(e) => {
                warn!(error = %e, "blacklist unavailable, prompts unfiltered");
                None
            }
        }
    }
}

fn dedup_ci(items: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
