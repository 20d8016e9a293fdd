//! MuseEngine: the main entry point for extraction and prompt generation

use crate::extract::{ExtractedMetadata, MetadataExtractor};
use crate::nlp::{DateParser, PosTagger};
use crate::prompts::{
    Prompt, PromptGenerator, PromptLifecycleManager, TopicSuggestion, TopicSuggestionBuilder,
    Tone, DEFAULT_SUGGESTION_CAP,
};
use crate::store::{BlacklistStore, EntryStore, JournalEntry, PromptLedgerStore, StoreResult};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Wires the extraction pipeline, prompt generator, and lifecycle manager
/// over injected stores
///
/// All operations are best-effort by contract: extraction and generation
/// always return, possibly empty; store failures degrade to no-ops.
pub struct MuseEngine {
    extractor: MetadataExtractor,
    generator: PromptGenerator,
    lifecycle: Arc<PromptLifecycleManager>,
    suggestions: TopicSuggestionBuilder,
    entries: Arc<dyn EntryStore>,
    blacklist: Arc<dyn BlacklistStore>,
}

impl MuseEngine {
    /// Assemble an engine from explicit capabilities and stores
    pub fn new(
        tagger: Arc<dyn PosTagger>,
        date_parser: Arc<dyn DateParser>,
        entries: Arc<dyn EntryStore>,
        blacklist: Arc<dyn BlacklistStore>,
        ledger: Arc<dyn PromptLedgerStore>,
    ) -> Self {
        let lifecycle = Arc::new(PromptLifecycleManager::new(ledger));
        let extractor =
            MetadataExtractor::new(tagger, date_parser).with_blacklist(Arc::clone(&blacklist));
        let generator = PromptGenerator::new()
            .with_entry_store(Arc::clone(&entries))
            .with_blacklist(Arc::clone(&blacklist))
            .with_lifecycle(Arc::clone(&lifecycle));
        let suggestions = TopicSuggestionBuilder::new().with_entry_store(Arc::clone(&entries));
        Self {
            extractor,
            generator,
            lifecycle,
            suggestions,
            entries,
            blacklist,
        }
    }

    /// Assemble an engine over one store object implementing all three
    /// store traits
    pub fn with_store<S>(
        tagger: Arc<dyn PosTagger>,
        date_parser: Arc<dyn DateParser>,
        store: Arc<S>,
    ) -> Self
    where
        S: EntryStore + BlacklistStore + PromptLedgerStore + 'static,
    {
        Self::new(
            tagger,
            date_parser,
            Arc::clone(&store) as Arc<dyn EntryStore>,
            Arc::clone(&store) as Arc<dyn BlacklistStore>,
            store as Arc<dyn PromptLedgerStore>,
        )
    }

    /// Extract `{people, topics, dates}` from entry text
    pub async fn extract(&self, text: &str) -> ExtractedMetadata {
        self.extractor.extract(text).await
    }

    /// Persist an entry immediately, without waiting for extraction
    pub fn save_entry(&self, content: &str, draft: bool) -> StoreResult<JournalEntry> {
        let entry = JournalEntry::new(content).with_draft(draft);
        self.entries.insert(&entry)?;
        Ok(entry)
    }

    /// Run extraction for a stored entry and merge the result in
    ///
    /// Returns false when the entry was deleted while extraction ran; the
    /// result is dropped, never merged into a closed document.
    pub async fn extract_and_attach(&self, entry_id: Uuid) -> bool {
        let entry = match self.entries.get(entry_id) {
            Ok(Some(entry)) => entry,
            Ok(None) => return false,
            Err(e) => {
                warn!(entry_id = %entry_id, error = %e, "entry store unavailable");
                return false;
            }
        };

        let metadata = self.extractor.extract(&entry.content).await;

        match self.entries.attach_metadata(entry_id, &metadata) {
            Ok(true) => true,
            Ok(false) => {
                debug!(entry_id = %entry_id, "entry closed before extraction finished, result dropped");
                false
            }
            Err(e) => {
                warn!(entry_id = %entry_id, error = %e, "metadata merge failed");
                false
            }
        }
    }

    /// Background variant of [`Self::extract_and_attach`]
    pub fn spawn_extract(self: &Arc<Self>, entry_id: Uuid) -> JoinHandle<bool> {
        let engine = Arc::clone(self);
        tokio::spawn(async move { engine.extract_and_attach(entry_id).await })
    }

    /// Generate up to `count` tone-rendered prompts
    pub fn generate_prompts(
        &self,
        metadata: &ExtractedMetadata,
        tone: Tone,
        count: usize,
        source_text: Option<&str>,
    ) -> Vec<Prompt> {
        self.generator
            .generate_prompts(metadata, tone, count, source_text)
    }

    pub fn filter_used_prompts(&self, prompts: Vec<Prompt>) -> Vec<Prompt> {
        self.lifecycle.filter_used_prompts(prompts)
    }

    pub fn filter_expired_prompts(&self, prompts: Vec<Prompt>, days: i64) -> Vec<Prompt> {
        self.lifecycle.filter_expired_prompts(prompts, days)
    }

    pub fn mark_prompt_as_used(&self, prompt_id: Uuid) {
        self.lifecycle.mark_prompt_as_used(prompt_id);
    }

    /// Prompt placed into the open draft; hidden until removed or committed
    pub fn mark_inserted(&self, prompt_id: Uuid) {
        self.lifecycle.mark_inserted(prompt_id);
    }

    /// Prompt removed from the draft before save; re-shown immediately
    pub fn unmark_inserted(&self, prompt_id: Uuid) {
        self.lifecycle.unmark_inserted(prompt_id);
    }

    /// Draft saved: inserted prompts become permanently used
    pub fn commit_draft(&self) {
        self.lifecycle.commit_draft();
    }

    /// Draft abandoned: temporary markings vanish
    pub fn discard_draft(&self) {
        self.lifecycle.discard_draft();
    }

    /// Display-only topic chips for the current metadata
    pub fn topic_suggestions(
        &self,
        metadata: &ExtractedMetadata,
        cap: usize,
        exclude_names: &[String],
    ) -> Vec<TopicSuggestion> {
        self.suggestions.topic_suggestions(metadata, cap, exclude_names)
    }

    /// Suggestions with the default cap
    pub fn default_topic_suggestions(&self, metadata: &ExtractedMetadata) -> Vec<TopicSuggestion> {
        self.topic_suggestions(metadata, DEFAULT_SUGGESTION_CAP, &[])
    }

    pub fn blacklist(&self) -> &Arc<dyn BlacklistStore> {
        &self.blacklist
    }

    pub fn entries(&self) -> &Arc<dyn EntryStore> {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{LexiconTagger, RelativeDateParser};
    use crate::store::MemoryStore;

    fn engine() -> Arc<MuseEngine> {
        Arc::new(MuseEngine::with_store(
            Arc::new(LexiconTagger::new()),
            Arc::new(RelativeDateParser::new()),
            Arc::new(MemoryStore::new()),
        ))
    }

    #[tokio::test]
    async fn save_then_attach_round_trip() {
        let engine = engine();
        let entry = engine
            .save_entry("I met Henry for coffee yesterday.", false)
            .unwrap();
        assert!(entry.metadata.is_none());

        assert!(engine.extract_and_attach(entry.id).await);
        let stored = engine.entries().get(entry.id).unwrap().unwrap();
        let metadata = stored.metadata.unwrap();
        assert!(metadata.has_person("Henry"));
    }

    #[tokio::test]
    async fn deleted_entry_drops_extraction_result() {
        let engine = engine();
        let entry = engine.save_entry("I met Sarah.", false).unwrap();
        engine.entries().delete(entry.id).unwrap();
        assert!(!engine.extract_and_attach(entry.id).await);
    }

    #[tokio::test]
    async fn background_extraction_completes() {
        let engine = engine();
        let entry = engine.save_entry("Talked to Anna about the garden.", false).unwrap();
        let handle = engine.spawn_extract(entry.id);
        assert!(handle.await.unwrap());
        let stored = engine.entries().get(entry.id).unwrap().unwrap();
        assert!(stored.metadata.is_some());
    }

    #[tokio::test]
    async fn end_to_end_prompt_flow() {
        let engine = engine();
        let metadata = engine.extract("I met Henry at the lake.").await;
        let prompts = engine.generate_prompts(&metadata, Tone::Cozy, 5, None);
        assert!(!prompts.is_empty());

        let first = prompts[0].clone();
        engine.mark_inserted(first.id);
        assert!(engine
            .filter_used_prompts(vec![first.clone()])
            .is_empty());

        engine.discard_draft();
        assert_eq!(engine.filter_used_prompts(vec![first.clone()]).len(), 1);

        engine.mark_inserted(first.id);
        engine.commit_draft();
        assert!(engine.filter_used_prompts(vec![first]).is_empty());
    }
}
