//! Navigation synchronizer.
//!
//! Reconciles the session store with the host page's location. Forward
//! navigation (start, drill-down) pushes locations through the use case;
//! this component covers the opposite direction: host traversal
//! (back/forward buttons) and external navigation. Pressing back to a
//! parent investigation re-activates it, and leaving the investigation
//! route collapses the panel instead of leaving stale state.

use crate::investigation_usecase::InvestigationUseCase;
use finlens_core::location::HostLocation;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Observes the host location and applies the matching store transitions.
pub struct NavigationSynchronizer {
    usecase: Arc<InvestigationUseCase>,
    rx: watch::Receiver<String>,
}

impl NavigationSynchronizer {
    /// Creates a synchronizer subscribed to `host`. Subscription happens
    /// here, not at loop start, so traversals between construction and the
    /// first poll are not missed.
    pub fn new(usecase: Arc<InvestigationUseCase>, host: Arc<dyn HostLocation>) -> Self {
        Self {
            usecase,
            rx: host.subscribe(),
        }
    }

    /// Runs the observation loop until the host drops its channel.
    pub async fn run(mut self) {
        while self.rx.changed().await.is_ok() {
            let location = self.rx.borrow_and_update().clone();
            self.reconcile(&location).await;
        }
        debug!("host location channel closed, synchronizer stopping");
    }

    /// Spawns the observation loop onto the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Applies one observed location to the store.
    ///
    /// A location decoding to the already-current investigation is
    /// ignored. A known id is re-activated from history; an unknown id is
    /// restored from the decoded parameters. Neither path pushes a
    /// location back to the host, which would loop the synchronizer onto
    /// its own output. A non-investigation location while a session is
    /// active completes the session without touching the host.
    pub async fn reconcile(&self, location: &str) {
        let store = self.usecase.store();
        match self.usecase.codec().decode(location) {
            Some(partial) => {
                let snapshot = store.snapshot().await;
                if snapshot.current_id() == Some(partial.id.as_str()) {
                    return;
                }
                if snapshot.contains(&partial.id) {
                    info!(id = %partial.id, "host navigated to known investigation");
                    self.usecase.activate_from_host(&partial.id).await;
                } else {
                    info!(id = %partial.id, "host navigated to unknown investigation, restoring");
                    self.usecase.restore_from_host(partial).await;
                }
            }
            None => {
                if store.snapshot().await.is_active {
                    info!(location, "host left investigation route");
                    self.usecase.complete_from_host().await;
                }
            }
        }
    }
}
