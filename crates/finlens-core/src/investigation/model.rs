//! Investigation context domain model.
//!
//! An `InvestigationContext` uniquely identifies one analytic focus. It is
//! immutable by convention: contexts are created only by the session
//! store's start and drill-down transitions, never constructed ad hoc by a
//! view.

use super::breadcrumb::BreadcrumbItem;
use super::kind::InvestigationKind;
use super::scope::InvestigationScope;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What triggered the creation of an investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerSource {
    /// A summary metric tile was clicked.
    MetricCard,
    /// A chart element was clicked.
    ChartClick,
    /// An insight's attached action was taken.
    InsightAction,
    /// A quick-action shortcut was used.
    QuickAction,
    /// The context was restored from a shared or bookmarked location.
    SharedLink,
    /// Started programmatically.
    Manual,
}

impl Default for TriggerSource {
    fn default() -> Self {
        Self::Manual
    }
}

/// Lineage and provenance of an investigation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationMetadata {
    /// What triggered this investigation.
    pub source: TriggerSource,
    /// Drill depth, 0 for a root investigation.
    pub depth_level: u32,
    /// Id of the parent investigation, if this was a drill-down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_investigation_id: Option<String>,
    /// Ids of child investigations drilled from this one (append-only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_investigation_ids: Vec<String>,
}

/// One analytic focus session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationContext {
    /// Opaque unique token, generated at creation, never reused.
    pub id: String,
    /// Which kind of analysis this investigation performs.
    pub kind: InvestigationKind,
    /// The semantic coordinates of the investigation.
    pub scope: InvestigationScope,
    /// Display title.
    pub title: String,
    /// Optional longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the investigation was started.
    pub started_at: DateTime<Utc>,
    /// When the investigation was last modified, if ever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Root-to-current navigation trail. The last item is always the only
    /// active one.
    pub breadcrumbs: Vec<BreadcrumbItem>,
    /// Lineage and provenance.
    pub metadata: InvestigationMetadata,
    /// Free-form labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl InvestigationContext {
    /// Generates a fresh opaque context id.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Derives a display title from the kind and scope when the caller
    /// supplied none.
    pub fn derive_title(kind: InvestigationKind, scope: &InvestigationScope) -> String {
        match scope.display_fragment() {
            Some(fragment) => format!("{}: {}", kind.label(), fragment),
            None => kind.label().to_string(),
        }
    }
}
