//! Location handling: the shareable-link codec and the host location port.

mod codec;
mod host;

pub use codec::{LocationCodec, PartialInvestigation};
pub use host::HostLocation;
