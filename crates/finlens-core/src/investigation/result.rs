//! Aggregated result view-model.
//!
//! The combined data/insights view computed for an active investigation
//! from the external collaborators. Results are cached by context id in the
//! session state and recomputed whenever the active context or any
//! collaborator's data changes.

use super::request::DrillDownOption;
use crate::error::DataFetchError;
use crate::sources::{
    BudgetAnalysis, FinancialOverview, MonthlySummary, SpendingPatternSet, TransactionPage,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How strongly an insight should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightSeverity {
    Info,
    Notable,
    Warning,
}

/// A derived observation about the investigated data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub title: String,
    pub detail: String,
    pub severity: InsightSeverity,
    /// Heuristic confidence in [0, 1].
    pub confidence: f64,
    /// Optional narrowing step attached to the insight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<DrillDownOption>,
}

/// A follow-up the panel offers for the current investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Suggestion {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            detail: None,
        }
    }
}

/// The two sides of a comparison investigation's data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<MonthlySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<MonthlySummary>,
}

/// Collaborator payloads gathered for one investigation. Which sections are
/// present depends on the investigation kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<TransactionPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_summary: Option<MonthlySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<FinancialOverview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<SpendingPatternSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonSummary>,
}

/// The combined view-model for one investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    /// Id of the context this result was computed for.
    pub context_id: String,
    /// When the aggregation completed.
    pub generated_at: DateTime<Utc>,
    /// True while any underlying collaborator is still loading.
    pub loading: bool,
    /// First collaborator error in stable order, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DataFetchError>,
    /// Gathered collaborator payloads.
    pub summary: AggregateSummary,
    /// Derived observations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<Insight>,
    /// Offered follow-ups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    /// Offered narrowing steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drill_down_options: Vec<DrillDownOption>,
    /// Minimum confidence across insights, or the configured default when
    /// none were generated.
    pub confidence: f64,
}
