//! Investigation scope: the structured filter describing what an
//! investigation is about.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// The two month keys of a comparison investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPeriods {
    /// Month key (YYYY-MM) the comparison is measured against.
    pub baseline: String,
    /// Month key (YYYY-MM) being compared.
    pub comparison: String,
}

/// An ad hoc predicate attached to an investigation's scope.
///
/// Filters are keyed by id: adding a filter with an existing id replaces
/// it, removing a nonexistent id is a no-op. The global filter projection
/// produces synthetic entries of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeFilter {
    /// Stable filter identity within one scope.
    pub id: String,
    /// Field the predicate applies to (e.g. "category", "date").
    pub field: String,
    /// Predicate operator (e.g. "equals", "excludes", "between").
    pub op: String,
    /// Operand, kept as free-form JSON.
    pub value: serde_json::Value,
}

impl ScopeFilter {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        op: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            op: op.into(),
            value,
        }
    }
}

/// The semantic "coordinates" of an investigation.
///
/// All fields are optional; an empty scope is legal and represents an
/// unfiltered root investigation. Which fields are present selects the
/// collaborators the result aggregator queries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestigationScope {
    /// Category name under investigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Month key (YYYY-MM).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Calendar year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Inclusive date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Explicit transaction ids (transaction kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_ids: Option<Vec<String>>,
    /// Anomaly type under investigation (anomaly kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly_type: Option<String>,
    /// Pattern type under investigation (pattern kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<String>,
    /// Periods of a comparison investigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_periods: Option<ComparisonPeriods>,
    /// Ad hoc predicates keyed by filter id.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, ScopeFilter>,
}

impl InvestigationScope {
    /// Creates an empty (root) scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no coordinate or filter is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.month.is_none()
            && self.year.is_none()
            && self.date_range.is_none()
            && self.transaction_ids.is_none()
            && self.anomaly_type.is_none()
            && self.pattern_type.is_none()
            && self.comparison_periods.is_none()
            && self.filters.is_empty()
    }

    /// A short display fragment for titles and breadcrumb labels, drawn
    /// from the most specific coordinate present.
    pub fn display_fragment(&self) -> Option<String> {
        if let Some(category) = &self.category {
            return Some(category.clone());
        }
        if let Some(month) = &self.month {
            return Some(month.clone());
        }
        if let Some(range) = &self.date_range {
            return Some(format!("{} to {}", range.start, range.end));
        }
        if let Some(year) = self.year {
            return Some(year.to_string());
        }
        if let Some(anomaly) = &self.anomaly_type {
            return Some(anomaly.clone());
        }
        if let Some(pattern) = &self.pattern_type {
            return Some(pattern.clone());
        }
        if let Some(periods) = &self.comparison_periods {
            return Some(format!("{} vs {}", periods.baseline, periods.comparison));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scope() {
        let scope = InvestigationScope::new();
        assert!(scope.is_empty());
        assert_eq!(scope.display_fragment(), None);
    }

    #[test]
    fn test_display_fragment_prefers_category() {
        let scope = InvestigationScope {
            category: Some("Groceries".to_string()),
            month: Some("2024-03".to_string()),
            ..Default::default()
        };
        assert_eq!(scope.display_fragment().as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let scope = InvestigationScope {
            month: Some("2024-03".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&scope).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("month"));
        assert!(!obj.contains_key("category"));
        assert!(!obj.contains_key("filters"));
    }
}
