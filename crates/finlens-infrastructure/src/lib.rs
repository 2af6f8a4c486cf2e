//! Infrastructure adapters for FinLens.
//!
//! In-memory implementations of the core ports: a browser-like host
//! location, fixture data collaborators, and a settable ambient-filter
//! provider. Real shells replace these with adapters over their history
//! API and data services.

pub mod memory_location;
pub mod memory_sources;
pub mod static_filters;

pub use memory_location::MemoryHostLocation;
pub use memory_sources::{
    MemoryBudgetAnalysisSource, MemoryFinancialOverviewSource, MemoryMonthlySummarySource,
    MemorySpendingPatternSource, MemoryTransactionSource,
};
pub use static_filters::StaticGlobalFilters;
