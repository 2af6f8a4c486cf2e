//! Payload types returned by the external data collaborators.

use crate::investigation::{DateRange, InvestigationScope, ScopeFilter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One ledger transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    /// Signed amount; spend is negative, income positive.
    pub amount: f64,
}

/// A page of transactions with the unpaged total.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub total: usize,
}

/// Query parameters for the transaction collaborator, derived from an
/// investigation scope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<ScopeFilter>,
}

impl TransactionQuery {
    /// Projects the query-relevant coordinates out of a scope.
    pub fn from_scope(scope: &InvestigationScope) -> Self {
        Self {
            category: scope.category.clone(),
            month: scope.month.clone(),
            date_range: scope.date_range,
            transaction_ids: scope.transaction_ids.clone(),
            filters: scope.filters.values().cloned().collect(),
        }
    }
}

/// Per-category totals inside a monthly summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// One month of summarized activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Month key (YYYY-MM).
    pub month: String,
    pub total_spent: f64,
    pub total_income: f64,
    pub transaction_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_category: Vec<CategoryTotal>,
}

/// Direction of a category's recent movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

/// Statistics for one category across the analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category: String,
    pub monthly_average: f64,
    /// Normalized dispersion of monthly totals in [0, 1].
    pub volatility: f64,
    /// Share of total spend in [0, 1].
    pub share_of_total: f64,
    pub trend: TrendDirection,
}

/// Cross-category overview with volatility rankings and top categories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryStat>,
    /// Category names ordered by spend, largest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_categories: Vec<String>,
    pub total_monthly_average: f64,
}

impl FinancialOverview {
    /// Looks up the stats for a category by name.
    pub fn category_stat(&self, category: &str) -> Option<&CategoryStat> {
        self.categories.iter().find(|s| s.category == category)
    }
}

/// A recurring or anomalous spending pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPattern {
    pub id: String,
    /// Pattern type key (e.g. "recurring", "spike", "seasonal").
    pub pattern_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Detector confidence in [0, 1].
    pub confidence: f64,
    /// True when the detector flagged this pattern as anomalous.
    #[serde(default)]
    pub anomalous: bool,
}

/// The pattern collaborator's result set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPatternSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<SpendingPattern>,
}

impl SpendingPatternSet {
    /// Patterns touching the given category.
    pub fn for_category(&self, category: &str) -> Vec<&SpendingPattern> {
        self.patterns
            .iter()
            .filter(|p| p.categories.iter().any(|c| c == category))
            .collect()
    }

    /// Patterns flagged anomalous.
    pub fn anomalous(&self) -> Vec<&SpendingPattern> {
        self.patterns.iter().filter(|p| p.anomalous).collect()
    }
}

/// One category's budget line for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    pub category: String,
    pub budgeted: f64,
    pub spent: f64,
}

impl BudgetEntry {
    /// Amount over budget, zero when within budget.
    pub fn overrun(&self) -> f64 {
        (self.spent - self.budgeted).max(0.0)
    }
}

/// Budget-versus-actual analysis for one month.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAnalysis {
    /// Month key (YYYY-MM).
    pub month: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<BudgetEntry>,
}

impl BudgetAnalysis {
    /// Entries whose spend exceeds their budget, worst first.
    pub fn over_budget(&self) -> Vec<&BudgetEntry> {
        let mut over: Vec<&BudgetEntry> =
            self.entries.iter().filter(|e| e.overrun() > 0.0).collect();
        over.sort_by(|a, b| b.overrun().total_cmp(&a.overrun()));
        over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_scope() {
        let scope = InvestigationScope {
            category: Some("Groceries".to_string()),
            month: Some("2024-03".to_string()),
            ..Default::default()
        };
        let query = TransactionQuery::from_scope(&scope);
        assert_eq!(query.category.as_deref(), Some("Groceries"));
        assert_eq!(query.month.as_deref(), Some("2024-03"));
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_budget_over_budget_ordering() {
        let analysis = BudgetAnalysis {
            month: "2024-03".to_string(),
            entries: vec![
                BudgetEntry {
                    category: "Dining".to_string(),
                    budgeted: 200.0,
                    spent: 260.0,
                },
                BudgetEntry {
                    category: "Groceries".to_string(),
                    budgeted: 400.0,
                    spent: 640.0,
                },
                BudgetEntry {
                    category: "Transport".to_string(),
                    budgeted: 100.0,
                    spent: 80.0,
                },
            ],
        };
        let over = analysis.over_budget();
        assert_eq!(over.len(), 2);
        assert_eq!(over[0].category, "Groceries");
    }

    #[test]
    fn test_patterns_for_category() {
        let set = SpendingPatternSet {
            patterns: vec![
                SpendingPattern {
                    id: "p1".to_string(),
                    pattern_type: "recurring".to_string(),
                    description: "Weekly groceries".to_string(),
                    categories: vec!["Groceries".to_string()],
                    confidence: 0.9,
                    anomalous: false,
                },
                SpendingPattern {
                    id: "p2".to_string(),
                    pattern_type: "spike".to_string(),
                    description: "Holiday travel".to_string(),
                    categories: vec!["Travel".to_string()],
                    confidence: 0.8,
                    anomalous: true,
                },
            ],
        };
        assert_eq!(set.for_category("Groceries").len(), 1);
        assert_eq!(set.anomalous().len(), 1);
    }
}
