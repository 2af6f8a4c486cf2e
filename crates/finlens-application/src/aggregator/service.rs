//! Result aggregation service.
//!
//! For an active context, fans out to the kind-relevant data collaborators,
//! combines their loading/error/data states into one `AggregatedResult`,
//! and derives insights, suggestions and drill-down options. A result is
//! committed to the store's cache only if its originating context is still
//! current at commit time; a superseded fan-out is silently discarded.

use super::insights;
use super::templates;
use chrono::Utc;
use finlens_core::error::DataFetchError;
use finlens_core::investigation::{
    AggregateSummary, AggregatedResult, ComparisonSummary, InvestigationContext,
    InvestigationKind,
};
use finlens_core::sources::{
    BudgetAnalysisSource, FinancialOverviewSource, MonthlySummarySource, SourceState,
    SpendingPatternSource, TransactionQuery, TransactionSource,
};
use finlens_core::store::SessionStore;
use futures::join;
use std::sync::Arc;
use tracing::debug;

/// The bundle of external data collaborators the aggregator fans out to.
#[derive(Clone)]
pub struct CollaboratorSet {
    pub transactions: Arc<dyn TransactionSource>,
    pub monthly: Arc<dyn MonthlySummarySource>,
    pub overview: Arc<dyn FinancialOverviewSource>,
    pub patterns: Arc<dyn SpendingPatternSource>,
    pub budget: Arc<dyn BudgetAnalysisSource>,
}

/// Computes the combined view-model for the active investigation.
pub struct ResultAggregator {
    store: Arc<SessionStore>,
    sources: CollaboratorSet,
}

/// Folds one collaborator state into the combined loading/error pair and
/// yields its payload. Call order defines error priority: the first error
/// absorbed wins.
fn absorb<T>(
    state: SourceState<T>,
    loading: &mut bool,
    error: &mut Option<DataFetchError>,
) -> Option<T> {
    *loading = *loading || state.loading;
    if error.is_none() {
        *error = state.error;
    }
    state.data
}

impl ResultAggregator {
    pub fn new(store: Arc<SessionStore>, sources: CollaboratorSet) -> Self {
        Self { store, sources }
    }

    /// Computes an `AggregatedResult` for `context` without touching the
    /// cache.
    pub async fn aggregate(&self, context: &InvestigationContext) -> AggregatedResult {
        let mut loading = false;
        let mut error = None;
        let summary = self
            .gather(context, &mut loading, &mut error)
            .await;

        let config = &self.store.config().insights;
        let insights = insights::derive(context, &summary, config);
        let suggestions = templates::suggestions(context);
        let drill_down_options = templates::drill_down_options(context, &summary);
        let confidence = insights
            .iter()
            .map(|i| i.confidence)
            .fold(f64::INFINITY, f64::min);
        let confidence = if confidence.is_finite() {
            confidence
        } else {
            config.default_confidence
        };

        AggregatedResult {
            context_id: context.id.clone(),
            generated_at: Utc::now(),
            loading,
            error,
            summary,
            insights,
            suggestions,
            drill_down_options,
            confidence,
        }
    }

    /// Computes a result for `context` and commits it to the store cache.
    ///
    /// Returns the result and whether it was applied; a result whose
    /// context stopped being current while the fan-out was in flight is
    /// returned but never cached.
    pub async fn refresh(&self, context: &InvestigationContext) -> (AggregatedResult, bool) {
        let result = self.aggregate(context).await;
        let applied = self.store.commit_result(result.clone()).await;
        if !applied {
            debug!(id = %context.id, "aggregation superseded before commit");
        }
        (result, applied)
    }

    /// Recomputes the result for the currently active investigation, if
    /// any. Called when the active context or any collaborator's data
    /// changes.
    pub async fn refresh_current(&self) -> Option<AggregatedResult> {
        let current = self.store.current().await?;
        let (result, _applied) = self.refresh(&current).await;
        Some(result)
    }

    /// Kind-specific fan-out. Collaborators are queried concurrently but
    /// absorbed in a stable order: the kind-specific sources first, the
    /// generic overview/patterns sources last, so the first error
    /// reported is deterministic.
    async fn gather(
        &self,
        context: &InvestigationContext,
        loading: &mut bool,
        error: &mut Option<DataFetchError>,
    ) -> AggregateSummary {
        let scope = &context.scope;
        let query = TransactionQuery::from_scope(scope);
        let month = scope.month.clone().unwrap_or_default();
        let mut summary = AggregateSummary::default();

        match context.kind {
            InvestigationKind::Monthly => {
                let (monthly, transactions, budget, patterns) = join!(
                    self.sources.monthly.summary(&month),
                    self.sources.transactions.query(&query),
                    self.sources.budget.analysis(&month),
                    self.sources.patterns.patterns(),
                );
                summary.monthly_summary = absorb(monthly, loading, error);
                summary.transactions = absorb(transactions, loading, error);
                summary.budget = absorb(budget, loading, error);
                summary.patterns = absorb(patterns, loading, error);
            }
            InvestigationKind::Category
            | InvestigationKind::Anomaly
            | InvestigationKind::Trend => {
                let (transactions, overview, patterns) = join!(
                    self.sources.transactions.query(&query),
                    self.sources.overview.overview(),
                    self.sources.patterns.patterns(),
                );
                summary.transactions = absorb(transactions, loading, error);
                summary.overview = absorb(overview, loading, error);
                summary.patterns = absorb(patterns, loading, error);
            }
            InvestigationKind::Pattern => {
                let (transactions, patterns) = join!(
                    self.sources.transactions.query(&query),
                    self.sources.patterns.patterns(),
                );
                summary.transactions = absorb(transactions, loading, error);
                summary.patterns = absorb(patterns, loading, error);
            }
            InvestigationKind::Transaction => {
                let transactions = self.sources.transactions.query(&query).await;
                summary.transactions = absorb(transactions, loading, error);
            }
            InvestigationKind::Comparison => {
                let periods = scope.comparison_periods.clone().unwrap_or_else(|| {
                    finlens_core::investigation::ComparisonPeriods {
                        baseline: month.clone(),
                        comparison: month.clone(),
                    }
                });
                let (baseline, comparison, overview) = join!(
                    self.sources.monthly.summary(&periods.baseline),
                    self.sources.monthly.summary(&periods.comparison),
                    self.sources.overview.overview(),
                );
                summary.comparison = Some(ComparisonSummary {
                    baseline: absorb(baseline, loading, error),
                    comparison: absorb(comparison, loading, error),
                });
                summary.overview = absorb(overview, loading, error);
            }
        }
        summary
    }
}
