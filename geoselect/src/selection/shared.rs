//! Shared handle to the selection store.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::debug;

use super::store::{SelectionSnapshot, SelectionStore};
use crate::region::{Code, Level};

/// Cloneable handle to the single [`SelectionStore`].
///
/// Every mutation publishes a fresh snapshot on a `watch` channel, so
/// observers always see the latest state rather than a queue of
/// intermediate ones. Locks are held only for the duration of a mutation
/// and never across an `.await`.
#[derive(Clone)]
pub struct SharedSelection {
    store: Arc<RwLock<SelectionStore>>,
    tx: Arc<watch::Sender<SelectionSnapshot>>,
}

impl SharedSelection {
    pub fn new(store: SelectionStore) -> Self {
        let (tx, _rx) = watch::channel(store.get());
        Self {
            store: Arc::new(RwLock::new(store)),
            tx: Arc::new(tx),
        }
    }

    /// Flip membership of `code`; returns whether it is selected afterwards.
    pub fn toggle(&self, code: Code) -> bool {
        let (selected, snapshot) = {
            let mut store = self.store.write();
            let selected = store.toggle(code.clone());
            (selected, store.get())
        };
        debug!(code = %code, selected, "Selection toggled");
        self.tx.send_replace(snapshot);
        selected
    }

    /// Switch level, clearing the selection.
    pub fn set_level(&self, level: Level) {
        let snapshot = {
            let mut store = self.store.write();
            store.set_level(level);
            store.get()
        };
        debug!(level = %level, generation = snapshot.generation, "Selection level set");
        self.tx.send_replace(snapshot);
    }

    /// Empty the selection.
    pub fn clear(&self) {
        let snapshot = {
            let mut store = self.store.write();
            store.clear();
            store.get()
        };
        debug!(generation = snapshot.generation, "Selection cleared");
        self.tx.send_replace(snapshot);
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        self.store.read().get()
    }

    pub fn level(&self) -> Level {
        self.store.read().level()
    }

    /// Returns true if no invalidation happened since `generation` was observed.
    pub fn is_current(&self, generation: u64) -> bool {
        self.store.read().generation() == generation
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<SelectionSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for SharedSelection {
    fn default() -> Self {
        Self::new(SelectionStore::default())
    }
}
