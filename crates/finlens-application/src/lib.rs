//! Application layer for FinLens.
//!
//! This crate provides the use case implementations that coordinate the
//! core domain with the host's ports: the investigation operation set,
//! the result aggregator, and the navigation synchronizer.

pub mod aggregator;
pub mod investigation_usecase;
pub mod navigation_sync;

pub use aggregator::{CollaboratorSet, ResultAggregator};
pub use investigation_usecase::InvestigationUseCase;
pub use navigation_sync::NavigationSynchronizer;
