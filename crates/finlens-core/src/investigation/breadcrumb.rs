//! Breadcrumb trail model and builder.

use super::kind::InvestigationKind;
use super::model::InvestigationContext;
use super::scope::InvestigationScope;
use serde::{Deserialize, Serialize};

/// Id carried by the synthetic dashboard-root breadcrumb item.
pub const DASHBOARD_CRUMB_ID: &str = "dashboard";

/// One entry in an investigation's navigation trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    /// Context id this item navigates to, or [`DASHBOARD_CRUMB_ID`].
    pub id: String,
    /// Display label.
    pub label: String,
    /// Kind of the investigation behind this item, absent for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<InvestigationKind>,
    /// Partial scope of the investigation behind this item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<InvestigationScope>,
    /// Exactly one item per trail is active, and it is always the last.
    pub active: bool,
    /// Whether the UI may navigate through this item.
    pub clickable: bool,
}

impl BreadcrumbItem {
    fn dashboard_root() -> Self {
        Self {
            id: DASHBOARD_CRUMB_ID.to_string(),
            label: "Dashboard".to_string(),
            kind: None,
            scope: None,
            active: false,
            clickable: true,
        }
    }

    fn for_context(context: &InvestigationContext, active: bool) -> Self {
        Self {
            id: context.id.clone(),
            label: context.title.clone(),
            kind: Some(context.kind),
            scope: Some(context.scope.clone()),
            active,
            clickable: !active,
        }
    }
}

/// Derives breadcrumb trails from a context and its lineage.
///
/// `build` materializes at most one parent level per call: deeper ancestry
/// is reconstructed by re-running the builder when the user lands on the
/// parent. Multi-level trails are produced incrementally through `extend`
/// as the user drills deeper, so a trail only ever grows one hop at a
/// time. Full-ancestry reconstruction is intentionally not performed.
pub struct BreadcrumbBuilder;

impl BreadcrumbBuilder {
    /// Builds a trail for `context`: the dashboard root, the immediate
    /// parent when it resolves in `lookup`, then `context` itself as the
    /// active leaf.
    pub fn build<'a, F>(context: &InvestigationContext, lookup: F) -> Vec<BreadcrumbItem>
    where
        F: Fn(&str) -> Option<&'a InvestigationContext>,
    {
        let mut trail = vec![BreadcrumbItem::dashboard_root()];
        if let Some(parent_id) = &context.metadata.parent_investigation_id {
            if let Some(parent) = lookup(parent_id) {
                trail.push(BreadcrumbItem::for_context(parent, false));
            }
        }
        trail.push(BreadcrumbItem::for_context(context, true));
        trail
    }

    /// Extends a parent's trail with `child` as the new active leaf.
    ///
    /// The parent's leaf is deactivated and becomes clickable; every other
    /// item is carried unchanged. Used by drill-down, which appends to the
    /// existing trail rather than rebuilding it.
    pub fn extend(
        parent_trail: &[BreadcrumbItem],
        child: &InvestigationContext,
    ) -> Vec<BreadcrumbItem> {
        let mut trail: Vec<BreadcrumbItem> = parent_trail
            .iter()
            .map(|item| {
                if item.active {
                    let mut demoted = item.clone();
                    demoted.active = false;
                    demoted.clickable = true;
                    demoted
                } else {
                    item.clone()
                }
            })
            .collect();
        trail.push(BreadcrumbItem::for_context(child, true));
        trail
    }
}
