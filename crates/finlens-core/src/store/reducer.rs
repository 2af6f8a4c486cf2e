//! Pure session state transitions.
//!
//! Every transition takes the previous snapshot by reference and returns a
//! new one; a rejected transition returns an error and the previous
//! snapshot stays untouched. No transition performs I/O or navigation;
//! those side effects belong to the use case layer.

use super::state::SessionState;
use crate::config::EngineConfig;
use crate::error::{FinLensError, Result};
use crate::investigation::{
    AggregatedResult, Bookmark, InvestigationContext, PanelPosition, ScopeFilter, UpdatePatch,
};
use chrono::{DateTime, Utc};

impl SessionState {
    /// Prepends `id` to `list`, deduplicating by id and truncating to
    /// `limit`. Returns the ids evicted by truncation.
    fn promote(list: &mut Vec<String>, id: &str, limit: usize) -> Vec<String> {
        list.retain(|existing| existing != id);
        list.insert(0, id.to_string());
        list.split_off(list.len().min(limit))
    }

    fn insert_context(&mut self, context: InvestigationContext, config: &EngineConfig) {
        let id = context.id.clone();
        self.contexts.insert(id.clone(), context);

        let evicted = Self::promote(&mut self.history_ids, &id, config.history_limit);
        Self::promote(&mut self.recent_ids, &id, config.recent_limit);

        // Contexts evicted from history are logically destroyed: the
        // bounded lists are the only owners besides bookmarks, which hold
        // their own frozen copies.
        for gone in evicted {
            self.recent_ids.retain(|r| r != &gone);
            self.contexts.remove(&gone);
            self.result_cache.remove(&gone);
        }

        self.current_id = Some(id);
        self.is_active = true;
        self.panel.is_open = true;
    }

    /// Commits a freshly started root investigation.
    pub fn with_started(&self, context: InvestigationContext, config: &EngineConfig) -> Self {
        let mut next = self.clone();
        next.insert_context(context, config);
        next
    }

    /// Commits a drill-down child and records it on its parent.
    ///
    /// The child id is appended to the parent's `child_investigation_ids`
    /// exactly once. A parent that was evicted while the drill-down was in
    /// flight is tolerated: the child still commits, only the back-pointer
    /// update is skipped.
    pub fn with_drill_down(&self, child: InvestigationContext, config: &EngineConfig) -> Self {
        let mut next = self.clone();
        let child_id = child.id.clone();
        let parent_id = child.metadata.parent_investigation_id.clone();
        next.insert_context(child, config);

        if let Some(id) = parent_id {
            if let Some(parent) = next.contexts.get_mut(&id) {
                if !parent.metadata.child_investigation_ids.contains(&child_id) {
                    parent.metadata.child_investigation_ids.push(child_id);
                }
            }
        }
        next
    }

    /// Shallow-merges a patch into the current investigation. No-op when
    /// nothing is active.
    pub fn with_update(&self, patch: &UpdatePatch, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        let Some(id) = next.current_id.clone() else {
            return next;
        };
        if let Some(current) = next.contexts.get_mut(&id) {
            if let Some(title) = &patch.title {
                current.title = title.clone();
            }
            if let Some(description) = &patch.description {
                current.description = Some(description.clone());
            }
            if let Some(scope) = &patch.scope {
                current.scope = scope.clone();
            }
            if let Some(tags) = &patch.tags {
                current.tags = tags.clone();
            }
            current.last_updated = Some(now);
        }
        next
    }

    /// Ends the active investigation, keeping its record in history.
    pub fn with_completed(&self) -> Self {
        let mut next = self.clone();
        next.current_id = None;
        next.is_active = false;
        next.panel.is_open = false;
        next
    }

    /// Adds (or replaces, by id) a scope filter on the current
    /// investigation.
    pub fn with_filter_added(&self, filter: ScopeFilter, now: DateTime<Utc>) -> Result<Self> {
        let mut next = self.clone();
        let id = next
            .current_id
            .clone()
            .ok_or(FinLensError::no_active("add_filter"))?;
        let current = next
            .contexts
            .get_mut(&id)
            .ok_or(FinLensError::no_active("add_filter"))?;

        current.scope.filters.insert(filter.id.clone(), filter);
        current.last_updated = Some(now);
        Ok(next)
    }

    /// Removes a scope filter by id. Removing a nonexistent id is a no-op,
    /// not an error.
    pub fn with_filter_removed(&self, filter_id: &str, now: DateTime<Utc>) -> Result<Self> {
        let mut next = self.clone();
        let id = next
            .current_id
            .clone()
            .ok_or(FinLensError::no_active("remove_filter"))?;
        let current = next
            .contexts
            .get_mut(&id)
            .ok_or(FinLensError::no_active("remove_filter"))?;

        if current.scope.filters.remove(filter_id).is_some() {
            current.last_updated = Some(now);
        }
        Ok(next)
    }

    /// Activates a context already present in history, without creating a
    /// new context or touching depth. Returns `None` when the id has been
    /// evicted; navigation to vanished history is silently tolerated.
    pub fn with_activated(&self, id: &str) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let mut next = self.clone();
        next.current_id = Some(id.to_string());
        next.is_active = true;
        next.panel.is_open = true;
        Some(next)
    }

    /// Snapshots the current investigation into a bookmark.
    pub fn with_bookmark(
        &self,
        notes: Option<String>,
        custom_title: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(Self, Bookmark)> {
        let current = self.current().ok_or(FinLensError::no_active("bookmark"))?;
        let bookmark = Bookmark::snapshot(current, notes, custom_title, now);
        let mut next = self.clone();
        next.bookmarks.insert(0, bookmark.clone());
        Ok((next, bookmark))
    }

    /// Stores the panel width, clamped into the configured range.
    pub fn with_panel_width(&self, width: f64, config: &EngineConfig) -> Self {
        let mut next = self.clone();
        next.panel = next.panel.with_width(width, &config.panel);
        next
    }

    /// Moves the panel to the given docking side.
    pub fn with_panel_position(&self, position: PanelPosition) -> Self {
        let mut next = self.clone();
        next.panel.position = position;
        next
    }

    /// Opens or closes the panel.
    pub fn with_panel_open(&self, is_open: bool) -> Self {
        let mut next = self.clone();
        next.panel.is_open = is_open;
        next
    }

    /// Applies an aggregation result if its originating context is still
    /// current; a stale result returns `None` and the cache stays
    /// untouched.
    pub fn with_result(&self, result: AggregatedResult) -> Option<Self> {
        if self.current_id.as_deref() != Some(result.context_id.as_str()) {
            return None;
        }
        let mut next = self.clone();
        next.result_cache.insert(result.context_id.clone(), result);
        Some(next)
    }

    /// Empties history, recents and the result cache. The current
    /// investigation, when one is active, is re-seeded as the sole history
    /// entry so it remains reachable.
    pub fn with_history_cleared(&self) -> Self {
        let mut next = self.clone();
        next.history_ids.clear();
        next.recent_ids.clear();
        next.result_cache.clear();
        match next.current_id.clone() {
            Some(id) => {
                next.contexts.retain(|key, _| key == &id);
                next.history_ids.push(id);
            }
            None => next.contexts.clear(),
        }
        next
    }

    /// Empties the result cache only.
    pub fn with_result_cache_cleared(&self) -> Self {
        let mut next = self.clone();
        next.result_cache.clear();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investigation::{
        AggregateSummary, InvestigationKind, InvestigationMetadata, InvestigationScope,
    };

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn context(id: &str) -> InvestigationContext {
        InvestigationContext {
            id: id.to_string(),
            kind: InvestigationKind::Monthly,
            scope: InvestigationScope::new(),
            title: format!("Investigation {id}"),
            description: None,
            started_at: Utc::now(),
            last_updated: None,
            breadcrumbs: Vec::new(),
            metadata: InvestigationMetadata::default(),
            tags: Vec::new(),
        }
    }

    fn child_of(parent: &str, id: &str) -> InvestigationContext {
        let mut ctx = context(id);
        ctx.metadata.parent_investigation_id = Some(parent.to_string());
        ctx.metadata.depth_level = 1;
        ctx
    }

    fn result_for(id: &str) -> AggregatedResult {
        AggregatedResult {
            context_id: id.to_string(),
            generated_at: Utc::now(),
            loading: false,
            error: None,
            summary: AggregateSummary::default(),
            insights: Vec::new(),
            suggestions: Vec::new(),
            drill_down_options: Vec::new(),
            confidence: 0.7,
        }
    }

    #[test]
    fn test_started_sets_current_and_history() {
        let state = SessionState::new(&config()).with_started(context("a"), &config());
        assert_eq!(state.current_id(), Some("a"));
        assert!(state.is_active);
        assert!(state.panel.is_open);
        assert!(state.contains("a"));
        assert_eq!(state.recent().len(), 1);
    }

    #[test]
    fn test_history_deduplicates_by_id() {
        let cfg = config();
        let state = SessionState::new(&cfg)
            .with_started(context("a"), &cfg)
            .with_started(context("b"), &cfg)
            .with_started(context("a"), &cfg);
        assert_eq!(state.history_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_history_bounded_with_lru_eviction() {
        let cfg = config();
        let mut state = SessionState::new(&cfg);
        for i in 0..60 {
            state = state.with_started(context(&format!("ctx-{i}")), &cfg);
        }
        assert_eq!(state.history_ids.len(), 50);
        assert_eq!(state.recent_ids.len(), 10);
        // Oldest entries are gone from list, arena and cache alike.
        assert!(!state.contains("ctx-0"));
        assert!(state.get("ctx-0").is_none());
        assert!(state.contains("ctx-59"));
    }

    #[test]
    fn test_drill_down_records_child_on_parent_once() {
        let cfg = config();
        let state = SessionState::new(&cfg)
            .with_started(context("parent"), &cfg)
            .with_drill_down(child_of("parent", "child"), &cfg)
            .with_drill_down(child_of("parent", "child"), &cfg);
        let parent = state.get("parent").unwrap();
        assert_eq!(parent.metadata.child_investigation_ids, vec!["child"]);
        assert_eq!(state.current_id(), Some("child"));
    }

    #[test]
    fn test_update_merges_into_current() {
        let cfg = config();
        let state = SessionState::new(&cfg).with_started(context("a"), &cfg);
        let patch = UpdatePatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = state.with_update(&patch, Utc::now());
        let current = updated.current().unwrap();
        assert_eq!(current.title, "Renamed");
        assert!(current.last_updated.is_some());
        // The history entry is the same record.
        assert_eq!(updated.history()[0].title, "Renamed");
    }

    #[test]
    fn test_update_without_current_is_noop() {
        let cfg = config();
        let state = SessionState::new(&cfg);
        let patch = UpdatePatch {
            title: Some("x".to_string()),
            ..Default::default()
        };
        let next = state.with_update(&patch, Utc::now());
        assert_eq!(next, state);
    }

    #[test]
    fn test_completed_keeps_history() {
        let cfg = config();
        let state = SessionState::new(&cfg)
            .with_started(context("a"), &cfg)
            .with_completed();
        assert!(state.current().is_none());
        assert!(!state.is_active);
        assert!(!state.panel.is_open);
        assert!(state.contains("a"));
    }

    #[test]
    fn test_filter_add_replaces_by_id() {
        let cfg = config();
        let state = SessionState::new(&cfg).with_started(context("a"), &cfg);
        let first = ScopeFilter::new("f1", "amount", "gt", serde_json::json!(100));
        let replacement = ScopeFilter::new("f1", "amount", "gt", serde_json::json!(250));
        let state = state
            .with_filter_added(first, Utc::now())
            .unwrap()
            .with_filter_added(replacement.clone(), Utc::now())
            .unwrap();
        let filters = &state.current().unwrap().scope.filters;
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get("f1"), Some(&replacement));
    }

    #[test]
    fn test_filter_remove_is_idempotent() {
        let cfg = config();
        let state = SessionState::new(&cfg).with_started(context("a"), &cfg);
        let filter = ScopeFilter::new("f1", "amount", "gt", serde_json::json!(100));
        let state = state.with_filter_added(filter, Utc::now()).unwrap();

        let once = state.with_filter_removed("f1", Utc::now()).unwrap();
        let twice = once.with_filter_removed("f1", Utc::now()).unwrap();
        assert_eq!(once, twice);
        assert!(once.current().unwrap().scope.filters.is_empty());
    }

    #[test]
    fn test_filter_ops_require_active_investigation() {
        let cfg = config();
        let state = SessionState::new(&cfg);
        let filter = ScopeFilter::new("f1", "amount", "gt", serde_json::json!(1));
        assert!(state
            .with_filter_added(filter, Utc::now())
            .unwrap_err()
            .is_no_active());
        assert!(state
            .with_filter_removed("f1", Utc::now())
            .unwrap_err()
            .is_no_active());
    }

    #[test]
    fn test_activate_evicted_id_is_none() {
        let cfg = config();
        let state = SessionState::new(&cfg).with_started(context("a"), &cfg);
        assert!(state.with_activated("missing").is_none());

        let activated = state.with_activated("a").unwrap();
        assert_eq!(activated.current_id(), Some("a"));
    }

    #[test]
    fn test_bookmark_requires_current() {
        let cfg = config();
        let empty = SessionState::new(&cfg);
        assert!(empty
            .with_bookmark(None, None, Utc::now())
            .unwrap_err()
            .is_no_active());

        let state = empty.with_started(context("a"), &cfg);
        let (next, bookmark) = state
            .with_bookmark(Some("note".to_string()), None, Utc::now())
            .unwrap();
        assert_eq!(next.bookmarks.len(), 1);
        assert_eq!(bookmark.investigation.id, "a");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let cfg = config();
        let state = SessionState::new(&cfg)
            .with_started(context("old"), &cfg)
            .with_started(context("new"), &cfg);
        assert!(state.with_result(result_for("old")).is_none());

        let applied = state.with_result(result_for("new")).unwrap();
        assert!(applied.result_for("new").is_some());
        assert!(applied.result_for("old").is_none());
    }

    #[test]
    fn test_clear_history_reseeds_current() {
        let cfg = config();
        let state = SessionState::new(&cfg)
            .with_started(context("a"), &cfg)
            .with_started(context("b"), &cfg)
            .with_history_cleared();
        assert_eq!(state.history_ids, vec!["b"]);
        assert!(state.recent_ids.is_empty());
        assert_eq!(state.current_id(), Some("b"));
        assert!(state.get("a").is_none());
    }

    #[test]
    fn test_clear_history_without_current() {
        let cfg = config();
        let state = SessionState::new(&cfg)
            .with_started(context("a"), &cfg)
            .with_completed()
            .with_history_cleared();
        assert!(state.history_ids.is_empty());
        assert!(state.contexts.is_empty());
    }

    #[test]
    fn test_panel_width_clamps() {
        let cfg = config();
        let state = SessionState::new(&cfg).with_panel_width(10_000.0, &cfg);
        assert_eq!(state.panel.width, cfg.panel.max_width);
    }
}
