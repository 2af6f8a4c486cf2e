//! Host location port.
//!
//! The engine never talks to a browser history API directly; the embedding
//! shell provides this port. Pushes grow the host's back-history, replaces
//! do not.

use async_trait::async_trait;
use tokio::sync::watch;

/// The host page's navigable location.
///
/// # Observation contract
///
/// `subscribe` yields a receiver that is notified when the host location
/// changes through history traversal (back/forward) or external
/// navigation. The host does not echo the engine's own `push`/`replace`
/// calls back through the channel, mirroring how browsers fire `popstate`
/// only for traversal.
#[async_trait]
pub trait HostLocation: Send + Sync {
    /// Pushes a new location onto the host history.
    async fn push(&self, location: String);

    /// Replaces the current location without growing the history.
    async fn replace(&self, location: String);

    /// The current location string.
    fn current(&self) -> String;

    /// Observes traversal and external navigation.
    fn subscribe(&self) -> watch::Receiver<String>;
}
