//! Engine configuration.
//!
//! All limits and thresholds used by the engine live here so embedding
//! hosts can override them from a TOML fragment. Every field has a default,
//! so a partial config file is valid.

use crate::investigation::PanelPosition;
use serde::{Deserialize, Serialize};

/// Panel sizing and docking defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelConfig {
    /// Smallest width the panel can be resized to, in pixels.
    pub min_width: f64,
    /// Largest width the panel can be resized to, in pixels.
    pub max_width: f64,
    /// Width a freshly opened panel starts with, in pixels.
    pub default_width: f64,
    /// Docking side a freshly opened panel starts on.
    pub default_position: PanelPosition,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            min_width: 320.0,
            max_width: 960.0,
            default_width: 480.0,
            default_position: PanelPosition::Right,
        }
    }
}

/// Thresholds driving insight generation in the result aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightConfig {
    /// Category volatility above this value produces a "high volatility"
    /// insight.
    pub volatility_threshold: f64,
    /// Monthly spend above this value produces an "above average spending"
    /// insight.
    pub monthly_spend_threshold: f64,
    /// A category holding more than this share of total spend produces a
    /// "dominant category" insight.
    pub category_share_threshold: f64,
    /// Relative change between comparison periods above this value produces
    /// a "significant change" insight.
    pub comparison_delta_threshold: f64,
    /// Confidence reported when no insights were generated.
    pub default_confidence: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            volatility_threshold: 0.6,
            monthly_spend_threshold: 5000.0,
            category_share_threshold: 0.3,
            comparison_delta_threshold: 0.2,
            default_confidence: 0.7,
        }
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Maximum number of investigations kept in history (oldest evicted).
    pub history_limit: usize,
    /// Maximum number of investigations kept in the recent list.
    pub recent_limit: usize,
    /// Path prefix identifying investigation locations.
    pub route_prefix: String,
    /// Panel sizing defaults.
    pub panel: PanelConfig,
    /// Insight thresholds.
    pub insights: InsightConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            recent_limit: 10,
            route_prefix: "/investigations".to_string(),
            panel: PanelConfig::default(),
            insights: InsightConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a config with the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from a TOML fragment, filling missing fields with
    /// defaults.
    pub fn from_toml_str(raw: &str) -> crate::error::Result<Self> {
        toml::from_str(raw).map_err(|e| {
            crate::error::FinLensError::internal(format!("invalid engine config: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.route_prefix, "/investigations");
        assert_eq!(config.panel.min_width, 320.0);
        assert_eq!(config.panel.max_width, 960.0);
        assert_eq!(config.insights.default_confidence, 0.7);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            historyLimit = 20

            [panel]
            maxWidth = 700.0
            "#,
        )
        .unwrap();
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.panel.max_width, 700.0);
        // Untouched fields keep their defaults.
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.panel.min_width, 320.0);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml_str("historyLimit = \"many\"").is_err());
    }
}
