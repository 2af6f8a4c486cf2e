//! Result aggregation: fan-out, combination and derivation.

mod insights;
mod service;
mod templates;

pub use service::{CollaboratorSet, ResultAggregator};
