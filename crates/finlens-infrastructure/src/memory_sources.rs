//! In-memory fixture implementations of the collaborator contracts.
//!
//! Back tests, demos and headless embedding with fixed datasets. Each
//! source can also be put into a failing or perpetually-loading state to
//! exercise the aggregator's combination rules.

use async_trait::async_trait;
use finlens_core::error::DataFetchError;
use finlens_core::sources::{
    BudgetAnalysis, BudgetAnalysisSource, FinancialOverview, FinancialOverviewSource,
    MonthlySummary, MonthlySummarySource, SourceState, SpendingPatternSet,
    SpendingPatternSource, Transaction, TransactionPage, TransactionQuery, TransactionSource,
};
use std::collections::HashMap;

/// Failure/loading injection shared by the fixture sources.
#[derive(Default)]
struct Injection {
    error: Option<DataFetchError>,
    pending: bool,
}

impl Injection {
    fn intercept<T>(&self) -> Option<SourceState<T>> {
        if self.pending {
            return Some(SourceState::pending());
        }
        if let Some(error) = &self.error {
            return Some(SourceState::failed(error.clone()));
        }
        None
    }
}

/// Fixture transaction collaborator over a fixed ledger.
#[derive(Default)]
pub struct MemoryTransactionSource {
    transactions: Vec<Transaction>,
    injection: Injection,
}

impl MemoryTransactionSource {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            injection: Injection::default(),
        }
    }

    /// Makes every query fail with `error`.
    pub fn failing(error: DataFetchError) -> Self {
        Self {
            transactions: Vec::new(),
            injection: Injection {
                error: Some(error),
                pending: false,
            },
        }
    }

    /// Makes every query report a fetch still in flight.
    pub fn pending() -> Self {
        Self {
            transactions: Vec::new(),
            injection: Injection {
                error: None,
                pending: true,
            },
        }
    }

    fn matches(transaction: &Transaction, query: &TransactionQuery) -> bool {
        if let Some(category) = &query.category {
            if &transaction.category != category {
                return false;
            }
        }
        if let Some(month) = &query.month {
            if !transaction.date.to_string().starts_with(month.as_str()) {
                return false;
            }
        }
        if let Some(range) = &query.date_range {
            if transaction.date < range.start || transaction.date > range.end {
                return false;
            }
        }
        if let Some(ids) = &query.transaction_ids {
            if !ids.contains(&transaction.id) {
                return false;
            }
        }
        // Interpret the category predicates the global filter projection
        // produces; other ad hoc predicates are outside fixture scope.
        for filter in &query.filters {
            if filter.field != "category" {
                continue;
            }
            let listed = filter
                .value
                .as_array()
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|v| v.as_str())
                        .any(|c| c == transaction.category)
                })
                .unwrap_or(false);
            match filter.op.as_str() {
                "in" if !listed => return false,
                "notIn" if listed => return false,
                _ => {}
            }
        }
        true
    }
}

#[async_trait]
impl TransactionSource for MemoryTransactionSource {
    async fn query(&self, query: &TransactionQuery) -> SourceState<TransactionPage> {
        if let Some(intercepted) = self.injection.intercept() {
            return intercepted;
        }
        let items: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| Self::matches(t, query))
            .cloned()
            .collect();
        let total = items.len();
        SourceState::ready(TransactionPage { items, total })
    }
}

/// Fixture monthly-summary collaborator keyed by month.
#[derive(Default)]
pub struct MemoryMonthlySummarySource {
    summaries: HashMap<String, MonthlySummary>,
    injection: Injection,
}

impl MemoryMonthlySummarySource {
    pub fn new(summaries: Vec<MonthlySummary>) -> Self {
        Self {
            summaries: summaries.into_iter().map(|s| (s.month.clone(), s)).collect(),
            injection: Injection::default(),
        }
    }

    pub fn failing(error: DataFetchError) -> Self {
        Self {
            summaries: HashMap::new(),
            injection: Injection {
                error: Some(error),
                pending: false,
            },
        }
    }
}

#[async_trait]
impl MonthlySummarySource for MemoryMonthlySummarySource {
    async fn summary(&self, month: &str) -> SourceState<MonthlySummary> {
        if let Some(intercepted) = self.injection.intercept() {
            return intercepted;
        }
        match self.summaries.get(month) {
            Some(summary) => SourceState::ready(summary.clone()),
            None => SourceState::failed(DataFetchError::validation(
                "monthly-summary",
                format!("no summary for month '{month}'"),
            )),
        }
    }
}

/// Fixture overview collaborator returning a fixed overview.
#[derive(Default)]
pub struct MemoryFinancialOverviewSource {
    overview: FinancialOverview,
    injection: Injection,
}

impl MemoryFinancialOverviewSource {
    pub fn new(overview: FinancialOverview) -> Self {
        Self {
            overview,
            injection: Injection::default(),
        }
    }

    pub fn failing(error: DataFetchError) -> Self {
        Self {
            overview: FinancialOverview::default(),
            injection: Injection {
                error: Some(error),
                pending: false,
            },
        }
    }
}

#[async_trait]
impl FinancialOverviewSource for MemoryFinancialOverviewSource {
    async fn overview(&self) -> SourceState<FinancialOverview> {
        if let Some(intercepted) = self.injection.intercept() {
            return intercepted;
        }
        SourceState::ready(self.overview.clone())
    }
}

/// Fixture patterns collaborator returning a fixed pattern set.
#[derive(Default)]
pub struct MemorySpendingPatternSource {
    patterns: SpendingPatternSet,
    injection: Injection,
}

impl MemorySpendingPatternSource {
    pub fn new(patterns: SpendingPatternSet) -> Self {
        Self {
            patterns,
            injection: Injection::default(),
        }
    }

    pub fn pending() -> Self {
        Self {
            patterns: SpendingPatternSet::default(),
            injection: Injection {
                error: None,
                pending: true,
            },
        }
    }
}

#[async_trait]
impl SpendingPatternSource for MemorySpendingPatternSource {
    async fn patterns(&self) -> SourceState<SpendingPatternSet> {
        if let Some(intercepted) = self.injection.intercept() {
            return intercepted;
        }
        SourceState::ready(self.patterns.clone())
    }
}

/// Fixture budget collaborator keyed by month; months without a budget
/// resolve to an empty analysis.
#[derive(Default)]
pub struct MemoryBudgetAnalysisSource {
    analyses: HashMap<String, BudgetAnalysis>,
    injection: Injection,
}

impl MemoryBudgetAnalysisSource {
    pub fn new(analyses: Vec<BudgetAnalysis>) -> Self {
        Self {
            analyses: analyses.into_iter().map(|a| (a.month.clone(), a)).collect(),
            injection: Injection::default(),
        }
    }
}

#[async_trait]
impl BudgetAnalysisSource for MemoryBudgetAnalysisSource {
    async fn analysis(&self, month: &str) -> SourceState<BudgetAnalysis> {
        if let Some(intercepted) = self.injection.intercept() {
            return intercepted;
        }
        match self.analyses.get(month) {
            Some(analysis) => SourceState::ready(analysis.clone()),
            None => SourceState::ready(BudgetAnalysis {
                month: month.to_string(),
                entries: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finlens_core::investigation::ScopeFilter;

    fn transaction(id: &str, date: &str, category: &str, amount: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: format!("tx {id}"),
            category: category.to_string(),
            amount,
        }
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            transaction("t1", "2024-03-02", "Groceries", -54.20),
            transaction("t2", "2024-03-15", "Dining", -36.00),
            transaction("t3", "2024-04-01", "Groceries", -61.75),
        ]
    }

    #[tokio::test]
    async fn test_query_by_category_and_month() {
        let source = MemoryTransactionSource::new(ledger());
        let query = TransactionQuery {
            category: Some("Groceries".to_string()),
            month: Some("2024-03".to_string()),
            ..Default::default()
        };
        let state = source.query(&query).await;
        let page = state.data.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "t1");
    }

    #[tokio::test]
    async fn test_query_respects_excluded_categories() {
        let source = MemoryTransactionSource::new(ledger());
        let query = TransactionQuery {
            month: Some("2024-03".to_string()),
            filters: vec![ScopeFilter::new(
                "global-exclude-categories",
                "category",
                "notIn",
                serde_json::json!(["Dining"]),
            )],
            ..Default::default()
        };
        let page = source.query(&query).await.data.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].category, "Groceries");
    }

    #[tokio::test]
    async fn test_failing_source_surfaces_error() {
        let source =
            MemoryTransactionSource::failing(DataFetchError::network("transactions", "down"));
        let state = source.query(&TransactionQuery::default()).await;
        assert!(state.data.is_none());
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_missing_summary_is_validation_error() {
        let source = MemoryMonthlySummarySource::new(Vec::new());
        let state = source.summary("2024-03").await;
        assert!(state.error.is_some());
    }
}
