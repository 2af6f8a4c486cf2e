//! Global filter projection.
//!
//! Ambient dashboard filters (date range, included/excluded categories)
//! are projected one-way into a new investigation's scope as synthetic
//! predicate entries. Starting an investigation never mutates the ambient
//! filters.

use crate::investigation::{DateRange, ScopeFilter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Filter id prefix marking entries produced by the projection.
pub const GLOBAL_FILTER_PREFIX: &str = "global";

/// The ambient dashboard-wide filters at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_categories: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_categories: Vec<String>,
}

impl GlobalFilters {
    /// True when no ambient constraint is active.
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none()
            && self.included_categories.is_empty()
            && self.excluded_categories.is_empty()
    }
}

/// Read-only access to the ambient dashboard filters.
#[async_trait]
pub trait GlobalFilterProvider: Send + Sync {
    /// The ambient filters at this instant.
    async fn snapshot(&self) -> GlobalFilters;
}

/// Projects ambient filters into synthetic scope predicates, one entry per
/// active constraint.
pub fn project_global_filters(filters: &GlobalFilters) -> Vec<ScopeFilter> {
    let mut projected = Vec::new();
    if let Some(range) = &filters.date_range {
        projected.push(ScopeFilter::new(
            format!("{GLOBAL_FILTER_PREFIX}-date-range"),
            "date",
            "between",
            serde_json::json!({
                "start": range.start.to_string(),
                "end": range.end.to_string(),
            }),
        ));
    }
    if !filters.included_categories.is_empty() {
        projected.push(ScopeFilter::new(
            format!("{GLOBAL_FILTER_PREFIX}-include-categories"),
            "category",
            "in",
            serde_json::json!(filters.included_categories),
        ));
    }
    if !filters.excluded_categories.is_empty() {
        projected.push(ScopeFilter::new(
            format!("{GLOBAL_FILTER_PREFIX}-exclude-categories"),
            "category",
            "notIn",
            serde_json::json!(filters.excluded_categories),
        ));
    }
    projected
}
