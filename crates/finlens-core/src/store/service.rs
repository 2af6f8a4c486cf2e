//! Session store service.
//!
//! Wraps the immutable [`SessionState`] snapshot behind an async lock and
//! publishes every committed snapshot to subscribers. One write-lock hold
//! per operation makes each state transition atomic with respect to every
//! other; views only ever observe fully-applied snapshots.

use super::state::SessionState;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::investigation::{
    AggregatedResult, Bookmark, InvestigationContext, PanelPosition, ScopeFilter, UpdatePatch,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::debug;

/// The authoritative holder of session state.
pub struct SessionStore {
    config: EngineConfig,
    state: RwLock<Arc<SessionState>>,
    tx: watch::Sender<Arc<SessionState>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new(config: EngineConfig) -> Self {
        let initial = Arc::new(SessionState::new(&config));
        let (tx, _rx) = watch::channel(initial.clone());
        Self {
            config,
            state: RwLock::new(initial),
            tx,
        }
    }

    /// The engine configuration this store was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The latest committed snapshot.
    pub async fn snapshot(&self) -> Arc<SessionState> {
        self.state.read().await.clone()
    }

    /// Subscribes to committed snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.tx.subscribe()
    }

    /// The active investigation, if any.
    pub async fn current(&self) -> Option<InvestigationContext> {
        self.snapshot().await.current().cloned()
    }

    /// Applies one transition under the write lock and publishes the new
    /// snapshot.
    async fn commit<F>(&self, transition: F) -> Arc<SessionState>
    where
        F: FnOnce(&SessionState) -> SessionState,
    {
        let mut guard = self.state.write().await;
        let next = Arc::new(transition(guard.as_ref()));
        *guard = next.clone();
        self.tx.send_replace(next.clone());
        next
    }

    /// Commits a freshly started investigation.
    pub async fn commit_started(&self, context: InvestigationContext) {
        debug!(id = %context.id, kind = %context.kind, "starting investigation");
        self.commit(move |state| state.with_started(context, &self.config))
            .await;
    }

    /// Commits a drill-down child.
    pub async fn commit_drill_down(&self, child: InvestigationContext) {
        debug!(
            id = %child.id,
            parent = child.metadata.parent_investigation_id.as_deref().unwrap_or("-"),
            depth = child.metadata.depth_level,
            "drilling down"
        );
        self.commit(move |state| state.with_drill_down(child, &self.config))
            .await;
    }

    /// Shallow-merges a patch into the current investigation.
    pub async fn apply_update(&self, patch: &UpdatePatch) {
        self.commit(|state| state.with_update(patch, Utc::now()))
            .await;
    }

    /// Ends the active investigation.
    pub async fn complete(&self) {
        debug!("completing investigation");
        self.commit(SessionState::with_completed).await;
    }

    /// Adds (or replaces) a scope filter on the current investigation.
    pub async fn add_filter(&self, filter: ScopeFilter) -> Result<()> {
        let mut guard = self.state.write().await;
        let next = Arc::new(guard.with_filter_added(filter, Utc::now())?);
        *guard = next.clone();
        self.tx.send_replace(next);
        Ok(())
    }

    /// Removes a scope filter by id; removing a nonexistent id is a no-op.
    pub async fn remove_filter(&self, filter_id: &str) -> Result<()> {
        let mut guard = self.state.write().await;
        let next = Arc::new(guard.with_filter_removed(filter_id, Utc::now())?);
        *guard = next.clone();
        self.tx.send_replace(next);
        Ok(())
    }

    /// Activates a context already in history. Returns the activated
    /// context, or `None` (leaving state unchanged) when the id has been
    /// evicted.
    pub async fn activate_existing(&self, id: &str) -> Option<InvestigationContext> {
        let mut guard = self.state.write().await;
        match guard.with_activated(id) {
            Some(next) => {
                let next = Arc::new(next);
                *guard = next.clone();
                self.tx.send_replace(next.clone());
                next.current().cloned()
            }
            None => {
                debug!(id, "ignoring navigation to evicted history id");
                None
            }
        }
    }

    /// Snapshots the current investigation into a bookmark.
    pub async fn add_bookmark(
        &self,
        notes: Option<String>,
        custom_title: Option<String>,
    ) -> Result<Bookmark> {
        let mut guard = self.state.write().await;
        let (next, bookmark) = guard.with_bookmark(notes, custom_title, Utc::now())?;
        let next = Arc::new(next);
        *guard = next.clone();
        self.tx.send_replace(next);
        Ok(bookmark)
    }

    /// Stores the panel width, clamped into the configured range.
    pub async fn set_panel_width(&self, width: f64) {
        self.commit(|state| state.with_panel_width(width, &self.config))
            .await;
    }

    /// Moves the panel to the given docking side.
    pub async fn set_panel_position(&self, position: PanelPosition) {
        self.commit(|state| state.with_panel_position(position))
            .await;
    }

    /// Opens or closes the panel.
    pub async fn set_panel_open(&self, is_open: bool) {
        self.commit(|state| state.with_panel_open(is_open)).await;
    }

    /// Applies an aggregation result if its originating context is still
    /// current. Returns false when the result was stale and discarded.
    pub async fn commit_result(&self, result: AggregatedResult) -> bool {
        let mut guard = self.state.write().await;
        match guard.with_result(result) {
            Some(next) => {
                let next = Arc::new(next);
                *guard = next.clone();
                self.tx.send_replace(next);
                true
            }
            None => {
                debug!("discarding stale aggregation result");
                false
            }
        }
    }

    /// Empties history, recents and the result cache.
    pub async fn clear_history(&self) {
        self.commit(SessionState::with_history_cleared).await;
    }

    /// Empties the result cache.
    pub async fn clear_result_cache(&self) {
        self.commit(SessionState::with_result_cache_cleared).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investigation::{
        InvestigationKind, InvestigationMetadata, InvestigationScope,
    };

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

    #[tokio::test]
    async fn test_commit_publishes_to_subscribers() {
        let store = SessionStore::new(EngineConfig::default());
        let mut rx = store.subscribe();

        store.commit_started(context("a")).await;
        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.current_id(), Some("a"));
    }

    #[tokio::test]
    async fn test_activate_existing_round_trip() {
        let store = SessionStore::new(EngineConfig::default());
        store.commit_started(context("a")).await;
        store.commit_started(context("b")).await;

        let activated = store.activate_existing("a").await.unwrap();
        assert_eq!(activated.id, "a");
        assert_eq!(store.snapshot().await.current_id(), Some("a"));

        assert!(store.activate_existing("missing").await.is_none());
        assert_eq!(store.snapshot().await.current_id(), Some("a"));
    }

    #[tokio::test]
    async fn test_filter_error_leaves_state_untouched() {
        let store = SessionStore::new(EngineConfig::default());
        let before = store.snapshot().await;
        let err = store
            .add_filter(ScopeFilter::new("f", "a", "eq", serde_json::json!(1)))
            .await
            .unwrap_err();
        assert!(err.is_no_active());
        assert_eq!(*store.snapshot().await, *before);
    }
}
