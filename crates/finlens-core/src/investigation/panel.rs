//! Side panel UI state.

use crate::config::PanelConfig;
use serde::{Deserialize, Serialize};

/// Docking side of the analysis panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelPosition {
    Right,
    Bottom,
}

/// Open/closed state, width and docking side of the analysis panel.
///
/// Width is clamped into the configured range on every write; clamping is
/// the only business rule here, drag gestures and animation belong to the
/// host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelState {
    pub is_open: bool,
    pub width: f64,
    pub position: PanelPosition,
}

impl PanelState {
    /// Creates a closed panel with the configured defaults.
    pub fn closed(config: &PanelConfig) -> Self {
        Self {
            is_open: false,
            width: config.default_width,
            position: config.default_position,
        }
    }

    /// Returns a copy with `width` clamped into the configured range.
    pub fn with_width(&self, width: f64, config: &PanelConfig) -> Self {
        Self {
            width: width.clamp(config.min_width, config.max_width),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_uses_defaults() {
        let config = PanelConfig::default();
        let panel = PanelState::closed(&config);
        assert!(!panel.is_open);
        assert_eq!(panel.width, config.default_width);
        assert_eq!(panel.position, PanelPosition::Right);
    }

    #[test]
    fn test_width_clamps_high() {
        let config = PanelConfig::default();
        let panel = PanelState::closed(&config).with_width(10_000.0, &config);
        assert_eq!(panel.width, config.max_width);
    }

    #[test]
    fn test_width_clamps_low() {
        let config = PanelConfig::default();
        let panel = PanelState::closed(&config).with_width(1.0, &config);
        assert_eq!(panel.width, config.min_width);
    }

    #[test]
    fn test_position_serde_round_trip() {
        let json = serde_json::to_string(&PanelPosition::Bottom).unwrap();
        assert_eq!(json, "\"bottom\"");
        let back: PanelPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PanelPosition::Bottom);
    }
}
