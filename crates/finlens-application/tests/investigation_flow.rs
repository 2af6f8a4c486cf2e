//! End-to-end flows through the use case, aggregator and synchronizer,
//! driven against the in-memory infrastructure adapters.

use chrono::NaiveDate;
use finlens_application::{
    CollaboratorSet, InvestigationUseCase, NavigationSynchronizer, ResultAggregator,
};
use finlens_core::config::EngineConfig;
use finlens_core::error::DataFetchError;
use finlens_core::filters::GlobalFilters;
use finlens_core::investigation::{
    DrillDownOption, InvestigationKind, InvestigationScope, ShareOptions, StartConfig,
    TriggerSource,
};
use finlens_core::location::HostLocation;
use finlens_core::sources::{
    BudgetAnalysis, BudgetEntry, CategoryStat, CategoryTotal, FinancialOverview, MonthlySummary,
    SpendingPattern, SpendingPatternSet, Transaction, TrendDirection,
};
use finlens_core::store::SessionStore;
use finlens_infrastructure::{
    MemoryBudgetAnalysisSource, MemoryFinancialOverviewSource, MemoryHostLocation,
    MemoryMonthlySummarySource, MemorySpendingPatternSource, MemoryTransactionSource,
    StaticGlobalFilters,
};
use std::sync::Arc;

struct Harness {
    store: Arc<SessionStore>,
    usecase: Arc<InvestigationUseCase>,
    host: Arc<MemoryHostLocation>,
    aggregator: ResultAggregator,
    sync: NavigationSynchronizer,
}

fn transaction(id: &str, date: &str, category: &str, amount: f64) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description: format!("tx {id}"),
        category: category.to_string(),
        amount,
    }
}

fn fixture_sources() -> CollaboratorSet {
    CollaboratorSet {
        transactions: Arc::new(MemoryTransactionSource::new(vec![
            transaction("t1", "2024-03-02", "Groceries", -54.20),
            transaction("t2", "2024-03-09", "Groceries", -61.75),
            transaction("t3", "2024-03-15", "Dining", -36.00),
        ])),
        monthly: Arc::new(MemoryMonthlySummarySource::new(vec![MonthlySummary {
            month: "2024-03".to_string(),
            total_spent: 6200.0,
            total_income: 4800.0,
            transaction_count: 87,
            by_category: vec![
                CategoryTotal {
                    category: "Groceries".to_string(),
                    amount: 640.0,
                },
                CategoryTotal {
                    category: "Dining".to_string(),
                    amount: 410.0,
                },
            ],
        }])),
        overview: Arc::new(MemoryFinancialOverviewSource::new(FinancialOverview {
            categories: vec![CategoryStat {
                category: "Groceries".to_string(),
                monthly_average: 520.0,
                volatility: 0.72,
                share_of_total: 0.22,
                trend: TrendDirection::Rising,
            }],
            top_categories: vec!["Groceries".to_string(), "Dining".to_string()],
            total_monthly_average: 2400.0,
        })),
        patterns: Arc::new(MemorySpendingPatternSource::new(SpendingPatternSet {
            patterns: vec![SpendingPattern {
                id: "p1".to_string(),
                pattern_type: "spike".to_string(),
                description: "Grocery spend spikes at month start".to_string(),
                categories: vec!["Groceries".to_string()],
                confidence: 0.82,
                anomalous: true,
            }],
        })),
        budget: Arc::new(MemoryBudgetAnalysisSource::new(vec![BudgetAnalysis {
            month: "2024-03".to_string(),
            entries: vec![BudgetEntry {
                category: "Dining".to_string(),
                budgeted: 300.0,
                spent: 410.0,
            }],
        }])),
    }
}

fn harness_with(sources: CollaboratorSet, filters: GlobalFilters) -> Harness {
    let store = Arc::new(SessionStore::new(EngineConfig::default()));
    let host = Arc::new(MemoryHostLocation::new("/"));
    let provider = Arc::new(StaticGlobalFilters::new(filters));
    let usecase = Arc::new(InvestigationUseCase::new(
        store.clone(),
        host.clone(),
        provider,
    ));
    let aggregator = ResultAggregator::new(store.clone(), sources);
    let sync = NavigationSynchronizer::new(usecase.clone(), host.clone());
    Harness {
        store,
        usecase,
        host,
        aggregator,
        sync,
    }
}

fn harness() -> Harness {
    harness_with(fixture_sources(), GlobalFilters::default())
}

fn monthly_march() -> StartConfig {
    StartConfig::for_kind(InvestigationKind::Monthly).with_scope(InvestigationScope {
        month: Some("2024-03".to_string()),
        ..Default::default()
    })
}

fn groceries_option() -> DrillDownOption {
    DrillDownOption::new(
        "Drill into Groceries",
        InvestigationKind::Category,
        InvestigationScope {
            category: Some("Groceries".to_string()),
            month: Some("2024-03".to_string()),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn test_start_then_drill_down_scenario() {
    let h = harness();

    let root = h.usecase.start(monthly_march()).await.unwrap();
    assert_eq!(root.metadata.depth_level, 0);
    assert_eq!(root.breadcrumbs.len(), 2);

    let child = h.usecase.drill_down(groceries_option()).await.unwrap();
    assert_eq!(child.metadata.depth_level, 1);
    assert_eq!(
        child.metadata.parent_investigation_id.as_deref(),
        Some(root.id.as_str())
    );

    // Three-item trail whose middle item is the clickable, inactive parent.
    assert_eq!(child.breadcrumbs.len(), 3);
    let middle = &child.breadcrumbs[1];
    assert_eq!(middle.id, root.id);
    assert!(middle.clickable);
    assert!(!middle.active);
    assert_eq!(child.breadcrumbs.iter().filter(|b| b.active).count(), 1);
    assert!(child.breadcrumbs[2].active);

    // The parent record gained the child exactly once.
    let snapshot = h.store.snapshot().await;
    let parent = snapshot.get(&root.id).unwrap();
    assert_eq!(parent.metadata.child_investigation_ids, vec![child.id.clone()]);

    // Both navigations pushed, so back-history grew twice.
    assert_eq!(h.host.depth(), 3);
    let state = h.store.snapshot().await;
    assert!(state.is_active);
    assert!(state.panel.is_open);
    assert_eq!(state.history().len(), 2);
    assert_eq!(state.recent().len(), 2);
}

#[tokio::test]
async fn test_invalid_kind_is_rejected_without_side_effects() {
    let h = harness();
    let err = h
        .usecase
        .start(StartConfig {
            kind: Some("weekly".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_invalid_config());
    assert!(!h.store.snapshot().await.is_active);
    assert_eq!(h.host.depth(), 1);
}

#[tokio::test]
async fn test_drill_down_without_active_fails() {
    let h = harness();
    let err = h.usecase.drill_down(groceries_option()).await.unwrap_err();
    assert!(err.is_no_active());
}

#[tokio::test]
async fn test_share_restores_on_another_engine_without_pushing() {
    let h = harness();
    h.usecase.start(monthly_march()).await.unwrap();
    h.usecase.drill_down(groceries_option()).await.unwrap();
    let link = h.usecase.share(ShareOptions::default()).await.unwrap();

    let other = harness();
    other.sync.reconcile(&link).await;

    let state = other.store.snapshot().await;
    let current = state.current().unwrap();
    assert_eq!(current.kind, InvestigationKind::Category);
    assert_eq!(current.scope.category.as_deref(), Some("Groceries"));
    assert_eq!(current.scope.month.as_deref(), Some("2024-03"));
    assert_eq!(current.metadata.source, TriggerSource::SharedLink);
    assert!(state.is_active);
    // Restoring must not push a location back at the host.
    assert_eq!(other.host.depth(), 1);
}

#[tokio::test]
async fn test_share_with_base_url() {
    let h = harness();
    h.usecase.start(monthly_march()).await.unwrap();
    let link = h
        .usecase
        .share(ShareOptions {
            base_url: Some("https://app.example.com/".to_string()),
        })
        .await
        .unwrap();
    assert!(link.starts_with("https://app.example.com/investigations?"));
}

#[tokio::test]
async fn test_back_button_returns_to_parent_then_collapses() {
    let h = harness();
    let root = h.usecase.start(monthly_march()).await.unwrap();
    let child = h.usecase.drill_down(groceries_option()).await.unwrap();
    assert_eq!(h.store.snapshot().await.current_id(), Some(child.id.as_str()));

    // Back to the parent's location: the parent context is re-activated
    // from history, no new context is created.
    h.host.back();
    h.sync.reconcile(&h.host.current()).await;
    let state = h.store.snapshot().await;
    assert_eq!(state.current_id(), Some(root.id.as_str()));
    assert_eq!(state.history().len(), 2);

    // Back past the investigation route: the session completes and the
    // panel collapses, but history is kept.
    h.host.back();
    h.sync.reconcile(&h.host.current()).await;
    let state = h.store.snapshot().await;
    assert!(!state.is_active);
    assert!(!state.panel.is_open);
    assert!(state.current().is_none());
    assert_eq!(state.history().len(), 2);
}

#[tokio::test]
async fn test_reconcile_ignores_current_location() {
    let h = harness();
    let root = h.usecase.start(monthly_march()).await.unwrap();
    let before = h.store.snapshot().await;

    h.sync.reconcile(&h.host.current()).await;
    let after = h.store.snapshot().await;
    assert_eq!(after.current_id(), Some(root.id.as_str()));
    assert_eq!(*after, *before);
}

#[tokio::test]
async fn test_navigate_to_breadcrumb_replaces_location() {
    let h = harness();
    let root = h.usecase.start(monthly_march()).await.unwrap();
    h.usecase.drill_down(groceries_option()).await.unwrap();
    let depth_before = h.host.depth();

    let activated = h.usecase.navigate_to_breadcrumb(&root.id).await.unwrap();
    assert_eq!(activated.id, root.id);
    assert_eq!(h.store.snapshot().await.current_id(), Some(root.id.as_str()));
    // Replace, not push.
    assert_eq!(h.host.depth(), depth_before);
    assert!(h.host.current().contains(&root.id));
}

#[tokio::test]
async fn test_navigate_to_evicted_breadcrumb_is_silent() {
    let h = harness();
    h.usecase.start(monthly_march()).await.unwrap();
    let before = h.store.snapshot().await;
    assert!(h.usecase.navigate_to_breadcrumb("gone").await.is_none());
    assert_eq!(*h.store.snapshot().await, *before);
}

#[tokio::test]
async fn test_complete_returns_to_dashboard() {
    let h = harness();
    h.usecase.start(monthly_march()).await.unwrap();
    h.usecase.complete().await;

    let state = h.store.snapshot().await;
    assert!(!state.is_active);
    assert!(state.current().is_none());
    assert_eq!(state.history().len(), 1);
    assert_eq!(h.host.current(), "/");
}

#[tokio::test]
async fn test_global_filters_project_into_new_scope() {
    let h = harness_with(
        fixture_sources(),
        GlobalFilters {
            excluded_categories: vec!["Transfers".to_string()],
            ..Default::default()
        },
    );
    let context = h
        .usecase
        .start(StartConfig::for_kind(InvestigationKind::Monthly))
        .await
        .unwrap();
    assert!(context
        .scope
        .filters
        .contains_key("global-exclude-categories"));

    // An explicit scope is taken as-is: no projection.
    let explicit = h.usecase.start(monthly_march()).await.unwrap();
    assert!(explicit.scope.filters.is_empty());
}

#[tokio::test]
async fn test_aggregate_monthly_combines_sources() {
    let h = harness();
    let context = h.usecase.start(monthly_march()).await.unwrap();
    let result = h.aggregator.aggregate(&context).await;

    assert!(!result.loading);
    assert!(result.error.is_none());
    assert!(result.summary.monthly_summary.is_some());
    assert!(result.summary.budget.is_some());
    // 6200 spent exceeds the 5000 threshold; Dining is over budget.
    assert!(result.insights.iter().any(|i| i.id == "above-average-spending"));
    assert!(result.insights.iter().any(|i| i.id == "over-budget"));
    // Confidence is the minimum across insights.
    let min = result
        .insights
        .iter()
        .map(|i| i.confidence)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(result.confidence, min);
    // Top categories become category drill options.
    assert!(result
        .drill_down_options
        .iter()
        .any(|o| o.scope.category.as_deref() == Some("Groceries")));
}

#[tokio::test]
async fn test_aggregate_error_priority_is_specific_first() {
    let mut sources = fixture_sources();
    sources.monthly = Arc::new(MemoryMonthlySummarySource::failing(
        DataFetchError::network("monthly-summary", "unreachable"),
    ));
    sources.transactions = Arc::new(MemoryTransactionSource::failing(
        DataFetchError::network("transactions", "unreachable"),
    ));
    let h = harness_with(sources, GlobalFilters::default());
    let context = h.usecase.start(monthly_march()).await.unwrap();

    let result = h.aggregator.aggregate(&context).await;
    // The monthly summary is checked before the generic collaborators.
    assert_eq!(result.error.unwrap().source_name, "monthly-summary");
}

#[tokio::test]
async fn test_aggregate_loading_while_any_source_pends() {
    let mut sources = fixture_sources();
    sources.patterns = Arc::new(MemorySpendingPatternSource::pending());
    let h = harness_with(sources, GlobalFilters::default());
    let context = h.usecase.start(monthly_march()).await.unwrap();

    let result = h.aggregator.aggregate(&context).await;
    assert!(result.loading);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_default_confidence_without_insights() {
    let h = harness();
    // A transaction investigation over an id that matches nothing yields
    // no insights.
    let context = h
        .usecase
        .start(
            StartConfig::for_kind(InvestigationKind::Transaction).with_scope(
                InvestigationScope {
                    transaction_ids: Some(vec!["missing".to_string()]),
                    ..Default::default()
                },
            ),
        )
        .await
        .unwrap();
    let result = h.aggregator.aggregate(&context).await;
    assert!(result.insights.is_empty());
    assert_eq!(result.confidence, 0.7);
}

#[tokio::test]
async fn test_superseded_aggregation_never_lands_in_cache() {
    let h = harness();
    let first = h.usecase.start(monthly_march()).await.unwrap();
    let stale = h.aggregator.aggregate(&first).await;

    // The user moves on before the fan-out result is committed.
    let second = h
        .usecase
        .start(StartConfig::for_kind(InvestigationKind::Category).with_scope(
            InvestigationScope {
                category: Some("Dining".to_string()),
                ..Default::default()
            },
        ))
        .await
        .unwrap();

    assert!(!h.store.commit_result(stale).await);
    let state = h.store.snapshot().await;
    assert!(state.result_for(&first.id).is_none());
    assert_eq!(state.current_id(), Some(second.id.as_str()));
}

#[tokio::test]
async fn test_refresh_current_commits_to_cache() {
    let h = harness();
    let context = h.usecase.start(monthly_march()).await.unwrap();
    let result = h.aggregator.refresh_current().await.unwrap();
    assert_eq!(result.context_id, context.id);

    let state = h.store.snapshot().await;
    assert!(state.result_for(&context.id).is_some());
}

#[tokio::test]
async fn test_filter_lifecycle_via_usecase() {
    let h = harness();
    h.usecase.start(monthly_march()).await.unwrap();

    h.usecase
        .add_filter(finlens_core::investigation::ScopeFilter::new(
            "amount-floor",
            "amount",
            "gt",
            serde_json::json!(50),
        ))
        .await
        .unwrap();
    let filters = &h.store.current().await.unwrap().scope.filters;
    assert!(filters.contains_key("amount-floor"));

    h.usecase.remove_filter("amount-floor").await.unwrap();
    h.usecase.remove_filter("amount-floor").await.unwrap();
    assert!(h.store.current().await.unwrap().scope.filters.is_empty());
}

#[tokio::test]
async fn test_update_patches_current_and_history() {
    let h = harness();
    h.usecase.start(monthly_march()).await.unwrap();
    h.usecase
        .update(finlens_core::investigation::UpdatePatch {
            title: Some("March deep dive".to_string()),
            ..Default::default()
        })
        .await;

    let state = h.store.snapshot().await;
    let current = state.current().unwrap();
    assert_eq!(current.title, "March deep dive");
    assert!(current.last_updated.is_some());
    assert_eq!(state.history()[0].title, "March deep dive");

    // Updating with no active investigation is a no-op, not an error.
    h.usecase.complete().await;
    h.usecase
        .update(finlens_core::investigation::UpdatePatch {
            title: Some("ignored".to_string()),
            ..Default::default()
        })
        .await;
    assert_eq!(h.store.snapshot().await.history()[0].title, "March deep dive");
}

#[tokio::test]
async fn test_bookmark_survives_history_clear() {
    let h = harness();
    let context = h.usecase.start(monthly_march()).await.unwrap();
    let bookmark = h
        .usecase
        .bookmark(Some("march check".to_string()), None)
        .await
        .unwrap();
    assert_eq!(bookmark.investigation.id, context.id);

    h.usecase.complete().await;
    h.usecase.clear_history().await;

    let state = h.store.snapshot().await;
    assert!(state.history().is_empty());
    assert_eq!(state.bookmarks.len(), 1);
    assert_eq!(state.bookmarks[0].investigation.id, context.id);
}

#[tokio::test]
async fn test_panel_operations() {
    let h = harness();
    h.usecase.start(monthly_march()).await.unwrap();
    assert!(h.store.snapshot().await.panel.is_open);

    h.usecase.set_panel_width(10_000.0).await;
    let config_max = h.store.config().panel.max_width;
    assert_eq!(h.store.snapshot().await.panel.width, config_max);

    h.usecase
        .set_panel_position(finlens_core::investigation::PanelPosition::Bottom)
        .await;
    h.usecase.toggle_panel().await;
    let panel = h.store.snapshot().await.panel.clone();
    assert!(!panel.is_open);
    assert_eq!(
        panel.position,
        finlens_core::investigation::PanelPosition::Bottom
    );
}

#[tokio::test]
async fn test_synchronizer_loop_observes_traversal() {
    let h = harness();
    let root = h.usecase.start(monthly_march()).await.unwrap();
    h.usecase.drill_down(groceries_option()).await.unwrap();

    let handle = NavigationSynchronizer::new(h.usecase.clone(), h.host.clone()).spawn();
    h.host.back();
    // Let the spawned loop drain the watch notification.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(h.store.snapshot().await.current_id(), Some(root.id.as_str()));
    handle.abort();
}
