//! Suggestion and drill-down templates.
//!
//! Static, kind-specific templates parameterized by the current scope.
//! Drill-down options name concrete categories when the gathered data
//! provides them (e.g. the month's top categories); the option structure
//! itself is fixed per kind.

use finlens_core::investigation::{
    AggregateSummary, DrillDownOption, InvestigationContext, InvestigationKind,
    InvestigationScope, Suggestion,
};

/// Follow-up suggestions for the panel.
pub fn suggestions(context: &InvestigationContext) -> Vec<Suggestion> {
    let scope = &context.scope;
    match context.kind {
        InvestigationKind::Monthly => {
            let month = scope.month.as_deref().unwrap_or("this month");
            vec![
                Suggestion::new("compare-previous", format!("Compare {month} with the previous month")),
                Suggestion::new("review-budget", format!("Review the budget for {month}")),
            ]
        }
        InvestigationKind::Category => {
            let category = scope.category.as_deref().unwrap_or("this category");
            vec![
                Suggestion::new("set-budget", format!("Set a budget for {category}")),
                Suggestion::new("category-trend", format!("Chart {category} over time")),
            ]
        }
        InvestigationKind::Anomaly => vec![
            Suggestion::new("tag-anomalies", "Tag the anomalous transactions"),
            Suggestion::new("widen-range", "Widen the date range to see recurrence"),
        ],
        InvestigationKind::Pattern => vec![Suggestion::new(
            "pattern-categories",
            "Break the pattern down by category",
        )],
        InvestigationKind::Transaction => vec![Suggestion::new(
            "similar-transactions",
            "Find similar transactions",
        )],
        InvestigationKind::Comparison => vec![Suggestion::new(
            "comparison-categories",
            "Compare the same periods per category",
        )],
        InvestigationKind::Trend => vec![Suggestion::new(
            "trend-forecast",
            "Project the trend forward three months",
        )],
    }
}

/// Narrowing steps offered for the current investigation.
pub fn drill_down_options(
    context: &InvestigationContext,
    summary: &AggregateSummary,
) -> Vec<DrillDownOption> {
    let scope = &context.scope;
    let mut options = Vec::new();

    match context.kind {
        InvestigationKind::Monthly => {
            // One category drill per top spending category of the month.
            if let Some(monthly) = &summary.monthly_summary {
                for total in monthly.by_category.iter().take(3) {
                    options.push(DrillDownOption::new(
                        format!("Drill into {}", total.category),
                        InvestigationKind::Category,
                        InvestigationScope {
                            category: Some(total.category.clone()),
                            month: scope.month.clone(),
                            ..Default::default()
                        },
                    ));
                }
            }
            options.push(DrillDownOption::new(
                "Look for anomalies this month",
                InvestigationKind::Anomaly,
                InvestigationScope {
                    month: scope.month.clone(),
                    ..Default::default()
                },
            ));
        }
        InvestigationKind::Category => {
            options.push(DrillDownOption::new(
                "Look for anomalies",
                InvestigationKind::Anomaly,
                InvestigationScope {
                    category: scope.category.clone(),
                    month: scope.month.clone(),
                    ..Default::default()
                },
            ));
            options.push(DrillDownOption::new(
                "Show the trend",
                InvestigationKind::Trend,
                InvestigationScope {
                    category: scope.category.clone(),
                    ..Default::default()
                },
            ));
            // The category's largest transactions, when data is present.
            if let Some(page) = &summary.transactions {
                let mut items: Vec<_> = page.items.iter().collect();
                items.sort_by(|a, b| b.amount.abs().total_cmp(&a.amount.abs()));
                let ids: Vec<String> = items.iter().take(5).map(|t| t.id.clone()).collect();
                if !ids.is_empty() {
                    options.push(DrillDownOption::new(
                        "Inspect the largest transactions",
                        InvestigationKind::Transaction,
                        InvestigationScope {
                            transaction_ids: Some(ids),
                            ..Default::default()
                        },
                    ));
                }
            }
        }
        InvestigationKind::Anomaly => {
            if let Some(patterns) = &summary.patterns {
                for pattern in patterns.anomalous().into_iter().take(3) {
                    options.push(DrillDownOption::new(
                        format!("Follow pattern: {}", pattern.description),
                        InvestigationKind::Pattern,
                        InvestigationScope {
                            pattern_type: Some(pattern.pattern_type.clone()),
                            ..Default::default()
                        },
                    ));
                }
            }
        }
        InvestigationKind::Pattern => {
            if let Some(category) = patterned_category(summary, scope) {
                options.push(DrillDownOption::new(
                    format!("Drill into {category}"),
                    InvestigationKind::Category,
                    InvestigationScope {
                        category: Some(category),
                        ..Default::default()
                    },
                ));
            }
        }
        InvestigationKind::Transaction => {}
        InvestigationKind::Comparison => {
            if let Some(periods) = &scope.comparison_periods {
                options.push(DrillDownOption::new(
                    format!("Focus on {}", periods.comparison),
                    InvestigationKind::Monthly,
                    InvestigationScope {
                        month: Some(periods.comparison.clone()),
                        ..Default::default()
                    },
                ));
            }
        }
        InvestigationKind::Trend => {
            if let Some(category) = scope.category.clone() {
                options.push(DrillDownOption::new(
                    format!("Back to {category}"),
                    InvestigationKind::Category,
                    InvestigationScope {
                        category: Some(category),
                        ..Default::default()
                    },
                ));
            }
        }
    }

    options
}

/// First category named by a pattern matching the investigated type.
fn patterned_category(summary: &AggregateSummary, scope: &InvestigationScope) -> Option<String> {
    let patterns = summary.patterns.as_ref()?;
    let pattern_type = scope.pattern_type.as_deref()?;
    patterns
        .patterns
        .iter()
        .filter(|p| p.pattern_type == pattern_type)
        .flat_map(|p| p.categories.iter())
        .next()
        .cloned()
}
