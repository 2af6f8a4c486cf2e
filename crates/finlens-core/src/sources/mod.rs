//! External data collaborator contracts and payload models.

mod contract;
mod model;

pub use contract::{
    BudgetAnalysisSource, FinancialOverviewSource, MonthlySummarySource, SourceState,
    SpendingPatternSource, TransactionSource,
};
pub use model::{
    BudgetAnalysis, BudgetEntry, CategoryStat, CategoryTotal, FinancialOverview, MonthlySummary,
    SpendingPattern, SpendingPatternSet, Transaction, TransactionPage, TransactionQuery,
    TrendDirection,
};
