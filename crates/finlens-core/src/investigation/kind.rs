//! Investigation kind: the closed set of analytic focus types.

use crate::error::FinLensError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of investigation kinds.
///
/// Every string boundary (start configs, decoded locations) parses into
/// this enum; unrecognized values are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvestigationKind {
    Monthly,
    Category,
    Anomaly,
    Pattern,
    Transaction,
    Comparison,
    Trend,
}

impl InvestigationKind {
    /// The wire representation used in location strings and start configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Category => "category",
            Self::Anomaly => "anomaly",
            Self::Pattern => "pattern",
            Self::Transaction => "transaction",
            Self::Comparison => "comparison",
            Self::Trend => "trend",
        }
    }

    /// Display label used for derived titles and breadcrumbs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly overview",
            Self::Category => "Category",
            Self::Anomaly => "Anomaly",
            Self::Pattern => "Spending pattern",
            Self::Transaction => "Transaction",
            Self::Comparison => "Comparison",
            Self::Trend => "Trend",
        }
    }
}

impl Default for InvestigationKind {
    fn default() -> Self {
        Self::Monthly
    }
}

impl fmt::Display for InvestigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestigationKind {
    type Err = FinLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "category" => Ok(Self::Category),
            "anomaly" => Ok(Self::Anomaly),
            "pattern" => Ok(Self::Pattern),
            "transaction" => Ok(Self::Transaction),
            "comparison" => Ok(Self::Comparison),
            "trend" => Ok(Self::Trend),
            other => Err(FinLensError::invalid_config(other)),
        }
    }
}
