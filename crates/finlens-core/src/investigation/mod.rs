//! Investigation domain module.
//!
//! Pure value types describing what is being investigated, plus the
//! breadcrumb builder. Contexts are created only by the session store's
//! start and drill-down transitions.
//!
//! # Module Structure
//!
//! - `kind`: the closed set of investigation kinds
//! - `scope`: structured filter types (`InvestigationScope`, `ScopeFilter`)
//! - `model`: the `InvestigationContext` entity and its metadata
//! - `request`: operation inputs (`StartConfig`, `DrillDownOption`, ...)
//! - `breadcrumb`: trail model and `BreadcrumbBuilder`
//! - `bookmark`: frozen investigation snapshots
//! - `panel`: side panel UI state
//! - `result`: the aggregated view-model cached per context

mod bookmark;
mod breadcrumb;
mod kind;
mod model;
mod panel;
mod request;
mod result;
mod scope;

pub use bookmark::Bookmark;
pub use breadcrumb::{BreadcrumbBuilder, BreadcrumbItem, DASHBOARD_CRUMB_ID};
pub use kind::InvestigationKind;
pub use model::{InvestigationContext, InvestigationMetadata, TriggerSource};
pub use panel::{PanelPosition, PanelState};
pub use request::{DrillDownOption, ShareOptions, StartConfig, UpdatePatch};
pub use result::{
    AggregateSummary, AggregatedResult, ComparisonSummary, Insight, InsightSeverity, Suggestion,
};
pub use scope::{ComparisonPeriods, DateRange, InvestigationScope, ScopeFilter};
