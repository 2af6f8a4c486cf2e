//! Error types for the FinLens engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a collaborator fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataFetchKind {
    /// The collaborator could not be reached.
    Network,
    /// The collaborator rejected the request parameters.
    Validation,
}

/// A failure surfaced by an external data collaborator.
///
/// These are passed through unmodified into `AggregatedResult.error` and
/// displayed, never thrown, so one failing data source cannot crash
/// navigation.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{source_name}: {message}")]
pub struct DataFetchError {
    /// Name of the collaborator that failed (e.g. "transactions").
    pub source_name: String,
    /// Failure classification.
    pub kind: DataFetchKind,
    /// Human-readable failure description.
    pub message: String,
}

impl DataFetchError {
    /// Creates a network failure for the named collaborator.
    pub fn network(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            kind: DataFetchKind::Network,
            message: message.into(),
        }
    }

    /// Creates a validation failure for the named collaborator.
    pub fn validation(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            kind: DataFetchKind::Validation,
            message: message.into(),
        }
    }
}

/// A shared error type for the FinLens engine.
///
/// Structural errors (`InvalidConfig`, `NoActiveInvestigation`) are raised
/// synchronously to the caller of the triggering operation and never leave
/// the store in a half-applied state.
#[derive(Error, Debug, Clone, Serialize)]
pub enum FinLensError {
    /// An investigation kind outside the closed set was supplied.
    #[error("Invalid investigation config: unrecognized kind '{kind}'")]
    InvalidConfig { kind: String },

    /// An operation requiring an active investigation was called while none
    /// is active.
    #[error("No active investigation for operation '{operation}'")]
    NoActiveInvestigation { operation: &'static str },

    /// A collaborator fetch failure, passed through unmodified.
    #[error("Data fetch error: {0}")]
    DataFetch(#[from] DataFetchError),

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FinLensError {
    /// Creates an InvalidConfig error for an unrecognized kind string.
    pub fn invalid_config(kind: impl Into<String>) -> Self {
        Self::InvalidConfig { kind: kind.into() }
    }

    /// Creates a NoActiveInvestigation error for the named operation.
    pub fn no_active(operation: &'static str) -> Self {
        Self::NoActiveInvestigation { operation }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an InvalidConfig error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Check if this is a NoActiveInvestigation error.
    pub fn is_no_active(&self) -> bool {
        matches!(self, Self::NoActiveInvestigation { .. })
    }

    /// Check if this is a collaborator fetch error.
    pub fn is_data_fetch(&self) -> bool {
        matches!(self, Self::DataFetch(_))
    }
}

/// A type alias for `Result<T, FinLensError>`.
pub type Result<T> = std::result::Result<T, FinLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = FinLensError::invalid_config("weekly");
        assert!(err.is_invalid_config());
        assert_eq!(
            err.to_string(),
            "Invalid investigation config: unrecognized kind 'weekly'"
        );
    }

    #[test]
    fn test_no_active_display() {
        let err = FinLensError::no_active("drill_down");
        assert!(err.is_no_active());
        assert!(err.to_string().contains("drill_down"));
    }

    #[test]
    fn test_data_fetch_passthrough() {
        let fetch = DataFetchError::network("transactions", "connection reset");
        let err: FinLensError = fetch.clone().into();
        assert!(err.is_data_fetch());
        match err {
            FinLensError::DataFetch(inner) => assert_eq!(inner, fetch),
            _ => unreachable!(),
        }
    }
}
