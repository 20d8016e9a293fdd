//! Prompt lifecycle state
//!
//! `Available → TemporarilyUsed → PermanentlyUsed`, with
//! `TemporarilyUsed → Available` on draft discard. Permanent use is the only
//! transition that persists; the temporarily-inserted set lives in memory
//! per draft so removing a prompt before save immediately re-shows it.
//! Expiry is derived, never stored: an `Available` record older than the
//! threshold reads as `Expired`, while `PermanentlyUsed` is terminal no
//! matter how old it gets.

use super::generator::{Prompt, PromptKind};
use crate::store::{PromptLedgerStore, StoreResult};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Lifecycle state of a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptState {
    Available,
    TemporarilyUsed,
    PermanentlyUsed,
    Expired,
}

impl PromptState {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptState::Available => "available",
            PromptState::TemporarilyUsed => "temporarily_used",
            PromptState::PermanentlyUsed => "permanently_used",
            PromptState::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(PromptState::Available),
            "temporarily_used" => Some(PromptState::TemporarilyUsed),
            "permanently_used" => Some(PromptState::PermanentlyUsed),
            "expired" => Some(PromptState::Expired),
            _ => None,
        }
    }
}

/// One prompt's persisted use record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptUseRecord {
    pub prompt_id: Uuid,
    pub state: PromptState,
    pub first_seen_at: DateTime<Utc>,
}

impl PromptUseRecord {
    pub fn seen(prompt_id: Uuid, at: DateTime<Utc>) -> Self {
        Self {
            prompt_id,
            state: PromptState::Available,
            first_seen_at: at,
        }
    }
}

/// Tracks prompt use across drafts and sessions
///
/// Ledger failures degrade to no-ops: filtering then relies on the
/// in-memory inserted set alone and marking is skipped, never fatal.
pub struct PromptLifecycleManager {
    ledger: Arc<dyn PromptLedgerStore>,
    /// Prompts currently inserted into the open draft
    inserted: DashMap<Uuid, DateTime<Utc>>,
}

impl PromptLifecycleManager {
    pub fn new(ledger: Arc<dyn PromptLedgerStore>) -> Self {
        Self {
            ledger,
            inserted: DashMap::new(),
        }
    }

    /// A prompt was placed into the current draft; nothing is persisted
    pub fn mark_inserted(&self, prompt_id: Uuid) {
        self.inserted.insert(prompt_id, Utc::now());
    }

    /// The prompt was removed from the draft before save; it becomes
    /// available again immediately
    pub fn unmark_inserted(&self, prompt_id: Uuid) {
        self.inserted.remove(&prompt_id);
    }

    /// Prompt ids currently placed in the open draft
    pub fn inserted_ids(&self) -> Vec<Uuid> {
        self.inserted.iter().map(|e| *e.key()).collect()
    }

    /// The draft was saved: every inserted prompt becomes permanently used
    pub fn commit_draft(&self) {
        let ids = self.inserted_ids();
        for id in ids {
            self.mark_prompt_as_used(id);
        }
        self.inserted.clear();
    }

    /// The draft was abandoned: temporary markings vanish, nothing persists
    pub fn discard_draft(&self) {
        self.inserted.clear();
    }

    /// Persist a prompt as permanently used; idempotent
    pub fn mark_prompt_as_used(&self, prompt_id: Uuid) {
        if let Err(e) = self.ledger.mark_permanent(prompt_id, Utc::now()) {
            warn!(prompt_id = %prompt_id, error = %e, "ledger unavailable, mark skipped");
        }
    }

    /// Derive the effective state of a prompt
    ///
    /// Only `Available` records age into `Expired`; a record exactly at the
    /// boundary is still valid.
    pub fn state_of(&self, prompt_id: Uuid, expiry_days: i64) -> StoreResult<PromptState> {
        if self.inserted.contains_key(&prompt_id) {
            return Ok(PromptState::TemporarilyUsed);
        }
        let Some(record) = self.ledger.get(prompt_id)? else {
            return Ok(PromptState::Available);
        };
        Ok(match record.state {
            PromptState::Available
                if Utc::now() - record.first_seen_at > Duration::days(expiry_days) =>
            {
                PromptState::Expired
            }
            state => state,
        })
    }

    /// Drop permanently-used and currently-inserted prompts; fillers are
    /// exempt from use tracking
    pub fn filter_used_prompts(&self, prompts: Vec<Prompt>) -> Vec<Prompt> {
        prompts
            .into_iter()
            .filter(|p| {
                if p.kind == PromptKind::Filler {
                    return true;
                }
                if self.inserted.contains_key(&p.id) {
                    return false;
                }
                match self.ledger.get(p.id) {
                    Ok(Some(record)) => record.state != PromptState::PermanentlyUsed,
                    Ok(None) => true,
                    Err(e) => {
                        warn!(error = %e, "ledger unavailable, used filter skipped");
                        true
                    }
                }
            })
            .collect()
    }

    /// Drop prompts whose first sighting is older than `days` full days
    ///
    /// Applies only to `Available` records; permanently-used prompts never
    /// expire (they are already terminal) and unseen prompts cannot be
    /// stale.
    pub fn filter_expired_prompts(&self, prompts: Vec<Prompt>, days: i64) -> Vec<Prompt> {
        self.filter_expired_at(prompts, days, Utc::now())
    }

    fn filter_expired_at(&self, prompts: Vec<Prompt>, days: i64, now: DateTime<Utc>) -> Vec<Prompt> {
        prompts
            .into_iter()
            .filter(|p| {
                if p.kind == PromptKind::Filler {
                    return true;
                }
                match self.ledger.get(p.id) {
                    Ok(Some(record)) => {
                        record.state != PromptState::Available
                            || now - record.first_seen_at <= Duration::days(days)
                    }
                    Ok(None) => true,
                    Err(e) => {
                        warn!(error = %e, "ledger unavailable, expiry filter skipped");
                        true
                    }
                }
            })
            .collect()
    }

    /// Note that a prompt has been surfaced; first sighting wins
    pub fn record_seen(&self, prompt_id: Uuid) {
        if let Err(e) = self.ledger.record_seen(prompt_id, Utc::now()) {
            warn!(prompt_id = %prompt_id, error = %e, "ledger unavailable, sighting dropped");
        }
    }
}
