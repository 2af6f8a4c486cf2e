//! Operation inputs for the session store and use case.

use super::kind::InvestigationKind;
use super::model::TriggerSource;
use super::scope::InvestigationScope;
use serde::{Deserialize, Serialize};

/// Partial configuration for starting an investigation.
///
/// Every field is optional: `kind` defaults to monthly, `scope` to empty,
/// and `id` is generated unless supplied. `kind` is carried as a string
/// because start configs arrive from UI triggers; it is parsed against the
/// closed set at the store boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<InvestigationScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<TriggerSource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl StartConfig {
    /// A config for the given kind with an empty scope.
    pub fn for_kind(kind: InvestigationKind) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            ..Default::default()
        }
    }

    /// Sets the scope.
    pub fn with_scope(mut self, scope: InvestigationScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Sets the trigger source.
    pub fn with_source(mut self, source: TriggerSource) -> Self {
        self.source = Some(source);
        self
    }
}

/// A narrowing step offered by the result aggregator and consumed by
/// `drill_down`.
///
/// Options are produced from typed templates, so the kind here is already a
/// member of the closed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDownOption {
    /// Display label for the option.
    pub label: String,
    /// Kind of the child investigation this option starts.
    pub kind: InvestigationKind,
    /// Scope of the child investigation.
    pub scope: InvestigationScope,
    /// Trigger recorded on the child context.
    #[serde(default)]
    pub source: TriggerSource,
}

impl DrillDownOption {
    pub fn new(
        label: impl Into<String>,
        kind: InvestigationKind,
        scope: InvestigationScope,
    ) -> Self {
        Self {
            label: label.into(),
            kind,
            scope,
            source: TriggerSource::InsightAction,
        }
    }
}

/// Shallow patch applied to the current investigation by `update`.
///
/// Present fields replace the matching context field wholesale; a present
/// `scope` replaces the whole scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<InvestigationScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl UpdatePatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.scope.is_none()
            && self.tags.is_none()
    }
}

/// Options for producing a shareable link to the current investigation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareOptions {
    /// Origin prepended to the encoded location (e.g.
    /// `https://app.example.com`). The bare location string is returned
    /// when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_kind_round_trips_through_parse() {
        let config = StartConfig::for_kind(InvestigationKind::Comparison);
        let parsed: InvestigationKind = config.kind.as_deref().unwrap().parse().unwrap();
        assert_eq!(parsed, InvestigationKind::Comparison);
    }

    #[test]
    fn test_empty_patch() {
        assert!(UpdatePatch::default().is_empty());
        let patch = UpdatePatch {
            title: Some("t".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
