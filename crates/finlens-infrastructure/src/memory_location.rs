//! In-memory host location.
//!
//! A browser-like history stack the engine can be driven against without a
//! real shell: `push`/`replace` mutate the stack silently, while `back`,
//! `forward` and `navigate` (external navigation) notify observers,
//! mirroring how browsers fire `popstate` only for traversal. A desktop or
//! web shell binds its real history API to the same [`HostLocation`] port.

use async_trait::async_trait;
use finlens_core::location::HostLocation;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::debug;

struct HistoryStack {
    entries: Vec<String>,
    index: usize,
}

/// An in-memory [`HostLocation`] with back/forward emulation.
pub struct MemoryHostLocation {
    stack: Mutex<HistoryStack>,
    tx: watch::Sender<String>,
}

impl MemoryHostLocation {
    /// Creates a history containing only `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        let (tx, _rx) = watch::channel(initial.clone());
        Self {
            stack: Mutex::new(HistoryStack {
                entries: vec![initial],
                index: 0,
            }),
            tx,
        }
    }

    /// Traverses one entry back, notifying observers. No-op at the oldest
    /// entry.
    pub fn back(&self) {
        let mut stack = self.stack.lock().expect("history lock poisoned");
        if stack.index == 0 {
            return;
        }
        stack.index -= 1;
        let location = stack.entries[stack.index].clone();
        debug!(%location, "history back");
        self.tx.send_replace(location);
    }

    /// Traverses one entry forward, notifying observers. No-op at the
    /// newest entry.
    pub fn forward(&self) {
        let mut stack = self.stack.lock().expect("history lock poisoned");
        if stack.index + 1 >= stack.entries.len() {
            return;
        }
        stack.index += 1;
        let location = stack.entries[stack.index].clone();
        debug!(%location, "history forward");
        self.tx.send_replace(location);
    }

    /// External navigation: pushes a location and notifies observers, as
    /// if the user typed an address or followed an outside link.
    pub fn navigate(&self, location: impl Into<String>) {
        let location = location.into();
        {
            let mut stack = self.stack.lock().expect("history lock poisoned");
            let keep = stack.index + 1;
            stack.entries.truncate(keep);
            stack.entries.push(location.clone());
            stack.index += 1;
        }
        debug!(%location, "external navigation");
        self.tx.send_replace(location);
    }

    /// Number of entries currently on the stack.
    pub fn depth(&self) -> usize {
        self.stack.lock().expect("history lock poisoned").entries.len()
    }
}

#[async_trait]
impl HostLocation for MemoryHostLocation {
    async fn push(&self, location: String) {
        let mut stack = self.stack.lock().expect("history lock poisoned");
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(location);
        stack.index += 1;
    }

    async fn replace(&self, location: String) {
        let mut stack = self.stack.lock().expect("history lock poisoned");
        let index = stack.index;
        stack.entries[index] = location;
    }

    fn current(&self) -> String {
        let stack = self.stack.lock().expect("history lock poisoned");
        stack.entries[stack.index].clone()
    }

    fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}
