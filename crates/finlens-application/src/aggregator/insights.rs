//! Insight heuristics.
//!
//! Kind-specific rules over the gathered collaborator payloads, driven by
//! the configured thresholds. Insight ids are stable slugs so the panel
//! can key on them across recomputes.

use finlens_core::config::InsightConfig;
use finlens_core::investigation::{
    AggregateSummary, DrillDownOption, Insight, InsightSeverity, InvestigationContext,
    InvestigationKind, InvestigationScope,
};

fn insight(
    id: &str,
    title: impl Into<String>,
    detail: impl Into<String>,
    severity: InsightSeverity,
    confidence: f64,
) -> Insight {
    Insight {
        id: id.to_string(),
        title: title.into(),
        detail: detail.into(),
        severity,
        confidence,
        action: None,
    }
}

/// Derives insights for `context` from the gathered payloads.
pub fn derive(
    context: &InvestigationContext,
    summary: &AggregateSummary,
    config: &InsightConfig,
) -> Vec<Insight> {
    match context.kind {
        InvestigationKind::Monthly => monthly(&context.scope, summary, config),
        InvestigationKind::Category => category(&context.scope, summary, config),
        InvestigationKind::Anomaly => anomaly(summary),
        InvestigationKind::Pattern => pattern(&context.scope, summary),
        InvestigationKind::Transaction => transaction(summary),
        InvestigationKind::Comparison => comparison(summary, config),
        InvestigationKind::Trend => trend(summary),
    }
}

fn monthly(
    scope: &InvestigationScope,
    summary: &AggregateSummary,
    config: &InsightConfig,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let month = scope.month.as_deref().unwrap_or("this month");

    if let Some(monthly) = &summary.monthly_summary {
        if monthly.total_spent > config.monthly_spend_threshold {
            insights.push(insight(
                "above-average-spending",
                "Above average spending",
                format!(
                    "Spending of {:.2} in {month} exceeds the {:.2} threshold",
                    monthly.total_spent, config.monthly_spend_threshold
                ),
                InsightSeverity::Warning,
                0.8,
            ));
        }
    }

    if let Some(budget) = &summary.budget {
        let over = budget.over_budget();
        if let Some(worst) = over.first() {
            let mut over_insight = insight(
                "over-budget",
                format!("Over budget in {} categories", over.len()),
                format!(
                    "{} is the furthest over, by {:.2}",
                    worst.category,
                    worst.overrun()
                ),
                InsightSeverity::Notable,
                0.75,
            );
            over_insight.action = Some(DrillDownOption::new(
                format!("Investigate {}", worst.category),
                InvestigationKind::Category,
                InvestigationScope {
                    category: Some(worst.category.clone()),
                    month: scope.month.clone(),
                    ..Default::default()
                },
            ));
            insights.push(over_insight);
        }
    }

    insights
}

fn category(
    scope: &InvestigationScope,
    summary: &AggregateSummary,
    config: &InsightConfig,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let Some(name) = scope.category.as_deref() else {
        return insights;
    };

    if let Some(stat) = summary
        .overview
        .as_ref()
        .and_then(|o| o.category_stat(name))
    {
        if stat.volatility > config.volatility_threshold {
            let mut volatile = insight(
                "high-volatility",
                format!("High volatility in {name}"),
                format!(
                    "Month-to-month variation of {:.0}% is above the {:.0}% threshold",
                    stat.volatility * 100.0,
                    config.volatility_threshold * 100.0
                ),
                InsightSeverity::Warning,
                0.85,
            );
            volatile.action = Some(DrillDownOption::new(
                format!("Look for anomalies in {name}"),
                InvestigationKind::Anomaly,
                InvestigationScope {
                    category: Some(name.to_string()),
                    ..Default::default()
                },
            ));
            insights.push(volatile);
        }
        if stat.share_of_total > config.category_share_threshold {
            insights.push(insight(
                "dominant-category",
                format!("{name} dominates spending"),
                format!(
                    "{name} accounts for {:.0}% of total spend",
                    stat.share_of_total * 100.0
                ),
                InsightSeverity::Notable,
                0.8,
            ));
        }
    }

    if let Some(patterns) = &summary.patterns {
        let anomalous = patterns
            .for_category(name)
            .into_iter()
            .filter(|p| p.anomalous)
            .count();
        if anomalous > 0 {
            insights.push(insight(
                "anomalous-patterns",
                format!("{anomalous} anomalous patterns touch {name}"),
                "Detected patterns in this category were flagged as unusual",
                InsightSeverity::Warning,
                0.8,
            ));
        }
    }

    insights
}

fn anomaly(summary: &AggregateSummary) -> Vec<Insight> {
    let mut insights = Vec::new();
    if let Some(patterns) = &summary.patterns {
        let anomalous = patterns.anomalous();
        if !anomalous.is_empty() {
            insights.push(insight(
                "anomalies-detected",
                format!("{} anomalous patterns detected", anomalous.len()),
                anomalous
                    .iter()
                    .map(|p| p.description.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
                InsightSeverity::Warning,
                0.8,
            ));
        }
    }
    insights
}

fn pattern(scope: &InvestigationScope, summary: &AggregateSummary) -> Vec<Insight> {
    let mut insights = Vec::new();
    if let (Some(patterns), Some(pattern_type)) = (&summary.patterns, &scope.pattern_type) {
        let matching: Vec<_> = patterns
            .patterns
            .iter()
            .filter(|p| &p.pattern_type == pattern_type)
            .collect();
        if !matching.is_empty() {
            let min_confidence = matching
                .iter()
                .map(|p| p.confidence)
                .fold(f64::INFINITY, f64::min);
            insights.push(insight(
                "matching-patterns",
                format!("{} {pattern_type} patterns found", matching.len()),
                matching
                    .iter()
                    .map(|p| p.description.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
                InsightSeverity::Info,
                min_confidence,
            ));
        }
    }
    insights
}

fn transaction(summary: &AggregateSummary) -> Vec<Insight> {
    let mut insights = Vec::new();
    if let Some(page) = &summary.transactions {
        if let Some(largest) = page
            .items
            .iter()
            .max_by(|a, b| a.amount.abs().total_cmp(&b.amount.abs()))
        {
            insights.push(insight(
                "largest-transaction",
                format!("Largest transaction: {:.2}", largest.amount.abs()),
                format!("{} on {}", largest.description, largest.date),
                InsightSeverity::Info,
                0.9,
            ));
        }
    }
    insights
}

fn comparison(summary: &AggregateSummary, config: &InsightConfig) -> Vec<Insight> {
    let mut insights = Vec::new();
    let Some(comparison) = &summary.comparison else {
        return insights;
    };
    if let (Some(baseline), Some(compared)) = (&comparison.baseline, &comparison.comparison) {
        if baseline.total_spent > 0.0 {
            let delta = (compared.total_spent - baseline.total_spent) / baseline.total_spent;
            if delta.abs() > config.comparison_delta_threshold {
                let direction = if delta > 0.0 { "up" } else { "down" };
                insights.push(insight(
                    "significant-change",
                    format!("Spending {direction} {:.0}%", delta.abs() * 100.0),
                    format!(
                        "{} spent {:.2} against {:.2} in {}",
                        compared.month, compared.total_spent, baseline.total_spent,
                        baseline.month
                    ),
                    InsightSeverity::Notable,
                    0.8,
                ));
            }
        }
    }
    insights
}

fn trend(summary: &AggregateSummary) -> Vec<Insight> {
    let mut insights = Vec::new();
    if let Some(overview) = &summary.overview {
        let rising: Vec<_> = overview
            .categories
            .iter()
            .filter(|s| s.trend == finlens_core::sources::TrendDirection::Rising)
            .map(|s| s.category.as_str())
            .collect();
        if !rising.is_empty() {
            insights.push(insight(
                "rising-categories",
                format!("{} categories trending up", rising.len()),
                rising.join(", "),
                InsightSeverity::Info,
                0.75,
            ));
        }
    }
    insights
}
