//! Fixed ambient-filter provider.

use async_trait::async_trait;
use finlens_core::filters::{GlobalFilterProvider, GlobalFilters};
use std::sync::Mutex;

/// A [`GlobalFilterProvider`] serving a settable snapshot.
///
/// Stands in for the dashboard's real filter bar: tests and headless
/// embedders set the ambient filters, the engine reads them at
/// investigation start.
#[derive(Default)]
pub struct StaticGlobalFilters {
    filters: Mutex<GlobalFilters>,
}

impl StaticGlobalFilters {
    pub fn new(filters: GlobalFilters) -> Self {
        Self {
            filters: Mutex::new(filters),
        }
    }

    /// Replaces the ambient filters.
    pub fn set(&self, filters: GlobalFilters) {
        *self.filters.lock().expect("filters lock poisoned") = filters;
    }
}

#[async_trait]
impl GlobalFilterProvider for StaticGlobalFilters {
    async fn snapshot(&self) -> GlobalFilters {
        self.filters.lock().expect("filters lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_reflects_set() {
        let provider = StaticGlobalFilters::default();
        assert!(provider.snapshot().await.is_empty());

        provider.set(GlobalFilters {
            excluded_categories: vec!["Transfers".to_string()],
            ..Default::default()
        });
        let snapshot = provider.snapshot().await;
        assert_eq!(snapshot.excluded_categories, vec!["Transfers".to_string()]);
    }
}
