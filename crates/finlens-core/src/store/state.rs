//! Session state snapshot.
//!
//! One immutable snapshot of the whole investigation session. Transitions
//! (in `reducer`) produce a new snapshot per mutation, so concurrent
//! observers never see a half-updated context.
//!
//! The parent/child relationship forms a tree but is stored flat: an arena
//! of contexts keyed by id plus recency-ordered id lists and back-pointers
//! (`parent_investigation_id`), which keeps eviction O(1) per entry and
//! avoids cyclic ownership. Because `current` is an arena entry, the
//! "current is synchronized with its history entry" invariant is
//! structural rather than maintained by copying.

use crate::config::EngineConfig;
use crate::investigation::{AggregatedResult, Bookmark, InvestigationContext, PanelState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable snapshot of the investigation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Arena of live contexts, keyed by id.
    pub(crate) contexts: HashMap<String, InvestigationContext>,
    /// History ids, most-recent-first, unique, bounded.
    pub(crate) history_ids: Vec<String>,
    /// Recent ids, most-recent-first, unique, bounded.
    pub(crate) recent_ids: Vec<String>,
    /// Id of the active investigation, if any.
    pub(crate) current_id: Option<String>,
    /// True while an investigation is active.
    pub is_active: bool,
    /// Analysis panel UI state.
    pub panel: PanelState,
    /// Frozen bookmark snapshots, most recent first.
    pub bookmarks: Vec<Bookmark>,
    /// Aggregated results keyed by context id. Written only through the
    /// identity-checked commit; cleared by the history/cache clears.
    pub(crate) result_cache: HashMap<String, AggregatedResult>,
}

impl SessionState {
    /// An empty session with a closed panel.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            contexts: HashMap::new(),
            history_ids: Vec::new(),
            recent_ids: Vec::new(),
            current_id: None,
            is_active: false,
            panel: PanelState::closed(&config.panel),
            bookmarks: Vec::new(),
            result_cache: HashMap::new(),
        }
    }

    /// The active investigation, if any.
    pub fn current(&self) -> Option<&InvestigationContext> {
        self.current_id.as_deref().and_then(|id| self.contexts.get(id))
    }

    /// Id of the active investigation, if any.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Looks up a context in the arena by id.
    pub fn get(&self, id: &str) -> Option<&InvestigationContext> {
        self.contexts.get(id)
    }

    /// True when `id` is present in history.
    pub fn contains(&self, id: &str) -> bool {
        self.history_ids.iter().any(|h| h == id)
    }

    /// History contexts, most recent first.
    pub fn history(&self) -> Vec<&InvestigationContext> {
        self.history_ids
            .iter()
            .filter_map(|id| self.contexts.get(id))
            .collect()
    }

    /// Recent contexts, most recent first.
    pub fn recent(&self) -> Vec<&InvestigationContext> {
        self.recent_ids
            .iter()
            .filter_map(|id| self.contexts.get(id))
            .collect()
    }

    /// The cached aggregated result for a context, if any.
    pub fn result_for(&self, id: &str) -> Option<&AggregatedResult> {
        self.result_cache.get(id)
    }
}
