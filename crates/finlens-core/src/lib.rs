//! FinLens core domain.
//!
//! The investigation session engine of the FinLens dashboard: value types
//! describing what is being investigated, the session store and its pure
//! reducer, the breadcrumb builder, the location codec, the global filter
//! projection, and the ports the engine consumes (data collaborators,
//! host location, ambient filters).
//!
//! Rendering, export and data ingestion are collaborators of this engine,
//! not part of it; they plug in through the traits in [`sources`],
//! [`location`] and [`filters`].

pub mod config;
pub mod error;
pub mod filters;
pub mod investigation;
pub mod location;
pub mod sources;
pub mod store;

// Re-export common error type
pub use error::{FinLensError, Result};
