//! Investigation use case.
//!
//! Orchestrates the session store, breadcrumb builder, location codec,
//! host location and filter projection into the public operation set the
//! dashboard UI calls. The store applies every state transition
//! atomically; this layer adds the navigation side effects around those
//! transitions.
//!
//! `start` and `drill_down` push a new host location so the back button
//! returns to the prior context; breadcrumb navigation and completion
//! replace the location instead, keeping the back-history from growing.

use chrono::Utc;
use finlens_core::error::{FinLensError, Result};
use finlens_core::filters::{project_global_filters, GlobalFilterProvider};
use finlens_core::investigation::{
    Bookmark, BreadcrumbBuilder, DrillDownOption, InvestigationContext, InvestigationKind,
    InvestigationMetadata, InvestigationScope, PanelPosition, ScopeFilter, ShareOptions,
    StartConfig, TriggerSource, UpdatePatch,
};
use finlens_core::location::{HostLocation, LocationCodec, PartialInvestigation};
use finlens_core::store::SessionStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Location the host is sent back to when an investigation completes.
const DASHBOARD_LOCATION: &str = "/";

/// Use case exposing the investigation operations to the UI layer.
pub struct InvestigationUseCase {
    /// Authoritative session state.
    store: Arc<SessionStore>,
    /// Codec for the shareable location string.
    codec: LocationCodec,
    /// Host page location port.
    host: Arc<dyn HostLocation>,
    /// Ambient dashboard filters, projected into new scopes.
    global_filters: Arc<dyn GlobalFilterProvider>,
}

impl InvestigationUseCase {
    /// Creates a use case over the given store and ports.
    pub fn new(
        store: Arc<SessionStore>,
        host: Arc<dyn HostLocation>,
        global_filters: Arc<dyn GlobalFilterProvider>,
    ) -> Self {
        let codec = LocationCodec::new(store.config().route_prefix.clone());
        Self {
            store,
            codec,
            host,
            global_filters,
        }
    }

    /// The underlying session store.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// The location codec, shared with the navigation synchronizer.
    pub fn codec(&self) -> &LocationCodec {
        &self.codec
    }

    /// Starts an investigation from a partial config.
    ///
    /// Missing fields are defaulted (`kind` to monthly, `scope` to empty,
    /// `id` generated), ambient global filters are projected into the new
    /// scope when the caller supplied none, breadcrumbs are computed, a
    /// new location is pushed, and the context is committed as current.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when `kind` is not in the closed set.
    pub async fn start(&self, config: StartConfig) -> Result<InvestigationContext> {
        let kind = match config.kind.as_deref() {
            Some(raw) => raw.parse::<InvestigationKind>()?,
            None => InvestigationKind::default(),
        };

        let mut scope = config.scope.clone().unwrap_or_default();
        if config.scope.is_none() {
            self.project_ambient_filters(&mut scope).await;
        }

        let context = self
            .build_context(ContextSeed {
                id: config.id,
                kind,
                scope,
                title: config.title,
                description: config.description,
                source: config.source.unwrap_or_default(),
                tags: config.tags,
            })
            .await;

        self.host.push(self.codec.encode(&context)).await;
        self.store.commit_started(context.clone()).await;
        info!(id = %context.id, kind = %kind, "investigation started");
        Ok(context)
    }

    /// Drills into a narrower child investigation of the current one.
    ///
    /// The child is stamped with the parent id and `depth_level + 1`, the
    /// child id is recorded on the parent, and the child's trail is the
    /// parent's trail extended by one item.
    ///
    /// # Errors
    ///
    /// `NoActiveInvestigation` when nothing is active.
    pub async fn drill_down(&self, option: DrillDownOption) -> Result<InvestigationContext> {
        let parent = self
            .store
            .current()
            .await
            .ok_or(FinLensError::no_active("drill_down"))?;

        let mut scope = option.scope;
        if scope.is_empty() {
            self.project_ambient_filters(&mut scope).await;
        }

        let title = InvestigationContext::derive_title(option.kind, &scope);
        let mut child = InvestigationContext {
            id: InvestigationContext::generate_id(),
            kind: option.kind,
            scope,
            title,
            description: None,
            started_at: Utc::now(),
            last_updated: None,
            breadcrumbs: Vec::new(),
            metadata: InvestigationMetadata {
                source: option.source,
                depth_level: parent.metadata.depth_level + 1,
                parent_investigation_id: Some(parent.id.clone()),
                child_investigation_ids: Vec::new(),
            },
            tags: Vec::new(),
        };
        child.breadcrumbs = BreadcrumbBuilder::extend(&parent.breadcrumbs, &child);

        self.host.push(self.codec.encode(&child)).await;
        self.store.commit_drill_down(child.clone()).await;
        info!(id = %child.id, parent = %parent.id, "drilled down");
        Ok(child)
    }

    /// Shallow-merges a patch into the current investigation. No-op when
    /// nothing is active.
    pub async fn update(&self, patch: UpdatePatch) {
        self.store.apply_update(&patch).await;
    }

    /// Ends the active investigation, closes the panel and replaces the
    /// host location with the dashboard root. The record stays in history
    /// for breadcrumb navigation.
    pub async fn complete(&self) {
        self.store.complete().await;
        self.host.replace(DASHBOARD_LOCATION.to_string()).await;
    }

    /// Adds (or replaces, by id) a scope filter on the current
    /// investigation.
    pub async fn add_filter(&self, filter: ScopeFilter) -> Result<()> {
        self.store.add_filter(filter).await
    }

    /// Removes a scope filter by id; removing a nonexistent id is a no-op.
    pub async fn remove_filter(&self, filter_id: &str) -> Result<()> {
        self.store.remove_filter(filter_id).await
    }

    /// Makes a context already in history current and replaces the host
    /// location. Navigating to an evicted id is a silent no-op returning
    /// `None`.
    pub async fn navigate_to_breadcrumb(&self, id: &str) -> Option<InvestigationContext> {
        let context = self.store.activate_existing(id).await?;
        self.host.replace(self.codec.encode(&context)).await;
        Some(context)
    }

    /// Snapshots the current investigation into a bookmark.
    ///
    /// # Errors
    ///
    /// `NoActiveInvestigation` when nothing is active.
    pub async fn bookmark(
        &self,
        notes: Option<String>,
        custom_title: Option<String>,
    ) -> Result<Bookmark> {
        self.store.add_bookmark(notes, custom_title).await
    }

    /// Produces a shareable location string for the current investigation
    /// without mutating state.
    ///
    /// # Errors
    ///
    /// `NoActiveInvestigation` when nothing is active.
    pub async fn share(&self, options: ShareOptions) -> Result<String> {
        let current = self
            .store
            .current()
            .await
            .ok_or(FinLensError::no_active("share"))?;
        let location = self.codec.encode(&current);
        Ok(match options.base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), location),
            None => location,
        })
    }

    /// Stores the panel width, clamped into the configured range.
    pub async fn set_panel_width(&self, width: f64) {
        self.store.set_panel_width(width).await;
    }

    /// Moves the panel to the given docking side.
    pub async fn set_panel_position(&self, position: PanelPosition) {
        self.store.set_panel_position(position).await;
    }

    /// Flips the panel open or closed.
    pub async fn toggle_panel(&self) {
        let is_open = self.store.snapshot().await.panel.is_open;
        self.store.set_panel_open(!is_open).await;
    }

    /// Empties history, recents and the result cache.
    pub async fn clear_history(&self) {
        self.store.clear_history().await;
    }

    /// Empties the result cache.
    pub async fn clear_result_cache(&self) {
        self.store.clear_result_cache().await;
    }

    // ------------------------------------------------------------------
    // Host-initiated entry points (navigation synchronizer)
    // ------------------------------------------------------------------

    /// Activates a history entry in response to host traversal, without
    /// touching the host location again.
    pub(crate) async fn activate_from_host(&self, id: &str) -> Option<InvestigationContext> {
        self.store.activate_existing(id).await
    }

    /// Restores a context decoded from the host location, without pushing
    /// (re-pushing would loop the synchronizer back on itself).
    pub(crate) async fn restore_from_host(
        &self,
        partial: PartialInvestigation,
    ) -> InvestigationContext {
        debug!(id = %partial.id, "restoring investigation from location");
        let context = self
            .build_context(ContextSeed {
                id: Some(partial.id),
                kind: partial.kind,
                scope: partial.scope,
                title: None,
                description: None,
                source: TriggerSource::SharedLink,
                tags: Vec::new(),
            })
            .await;
        self.store.commit_started(context.clone()).await;
        context
    }

    /// Ends the session in response to the host leaving the investigation
    /// route, without replacing the location the user navigated to.
    pub(crate) async fn complete_from_host(&self) {
        debug!("host left investigation route, completing");
        self.store.complete().await;
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn project_ambient_filters(&self, scope: &mut InvestigationScope) {
        let ambient = self.global_filters.snapshot().await;
        for filter in project_global_filters(&ambient) {
            scope.filters.insert(filter.id.clone(), filter);
        }
    }

    async fn build_context(&self, seed: ContextSeed) -> InvestigationContext {
        let title = seed
            .title
            .unwrap_or_else(|| InvestigationContext::derive_title(seed.kind, &seed.scope));
        let mut context = InvestigationContext {
            id: seed.id.unwrap_or_else(InvestigationContext::generate_id),
            kind: seed.kind,
            scope: seed.scope,
            title,
            description: seed.description,
            started_at: Utc::now(),
            last_updated: None,
            breadcrumbs: Vec::new(),
            metadata: InvestigationMetadata {
                source: seed.source,
                depth_level: 0,
                parent_investigation_id: None,
                child_investigation_ids: Vec::new(),
            },
            tags: seed.tags,
        };
        let snapshot = self.store.snapshot().await;
        context.breadcrumbs = BreadcrumbBuilder::build(&context, |pid| snapshot.get(pid));
        context
    }
}

/// Normalized inputs for a root context.
struct ContextSeed {
    id: Option<String>,
    kind: InvestigationKind,
    scope: InvestigationScope,
    title: Option<String>,
    description: Option<String>,
    source: TriggerSource,
    tags: Vec<String>,
}
