//! Collaborator source contracts.
//!
//! Each external data source exposes its latest state as
//! `{ data, loading, error }` plus a `refetch` that forces a fresh fetch.
//! The result aggregator composes these without assuming any caching
//! policy.

use super::model::{
    BudgetAnalysis, FinancialOverview, MonthlySummary, SpendingPatternSet, TransactionPage,
    TransactionQuery,
};
use crate::error::DataFetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The observable state of one collaborator fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceState<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DataFetchError>,
}

impl<T> SourceState<T> {
    /// A completed fetch.
    pub fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            loading: false,
            error: None,
        }
    }

    /// A fetch still in flight.
    pub fn pending() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    /// A failed fetch.
    pub fn failed(error: DataFetchError) -> Self {
        Self {
            data: None,
            loading: false,
            error: Some(error),
        }
    }
}

/// Transaction-query collaborator.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Returns transactions matching `query` with the unpaged total.
    async fn query(&self, query: &TransactionQuery) -> SourceState<TransactionPage>;

    /// Forces a fresh fetch.
    async fn refetch(&self, query: &TransactionQuery) -> SourceState<TransactionPage> {
        self.query(query).await
    }
}

/// Monthly-summary collaborator.
#[async_trait]
pub trait MonthlySummarySource: Send + Sync {
    /// Returns the summary for a month key (YYYY-MM).
    async fn summary(&self, month: &str) -> SourceState<MonthlySummary>;

    /// Forces a fresh fetch.
    async fn refetch(&self, month: &str) -> SourceState<MonthlySummary> {
        self.summary(month).await
    }
}

/// Category-statistics / financial-overview collaborator.
#[async_trait]
pub trait FinancialOverviewSource: Send + Sync {
    /// Returns per-category stats, volatility rankings and top categories.
    async fn overview(&self) -> SourceState<FinancialOverview>;

    /// Forces a fresh fetch.
    async fn refetch(&self) -> SourceState<FinancialOverview> {
        self.overview().await
    }
}

/// Spending-patterns collaborator.
#[async_trait]
pub trait SpendingPatternSource: Send + Sync {
    /// Returns the detected pattern set.
    async fn patterns(&self) -> SourceState<SpendingPatternSet>;

    /// Forces a fresh fetch.
    async fn refetch(&self) -> SourceState<SpendingPatternSet> {
        self.patterns().await
    }
}

/// Budget-analysis collaborator.
#[async_trait]
pub trait BudgetAnalysisSource: Send + Sync {
    /// Returns the budget-versus-actual analysis for a month key.
    async fn analysis(&self, month: &str) -> SourceState<BudgetAnalysis>;

    /// Forces a fresh fetch.
    async fn refetch(&self, month: &str) -> SourceState<BudgetAnalysis> {
        self.analysis(month).await
    }
}
