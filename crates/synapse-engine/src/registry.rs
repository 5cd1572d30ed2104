//! The barrier registry: ids currently in flight (spec §3).

use std::collections::HashSet;

use synapse_core::BarrierId;

/// Tracks which barrier ids have a pending layer queued or suspended.
///
/// Spec invariant: a barrier id is in the registry iff a pending layer
/// carrying that barrier is queued or suspended, and during a single drain
/// each barrier id is materialised in the queue at most once — which is
/// exactly what [`BarrierRegistry::register`] enforces by returning whether
/// the insert was new.
#[derive(Default)]
pub struct BarrierRegistry {
    in_flight: HashSet<BarrierId>,
}

impl BarrierRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as in flight. Returns `true` if it was not already
    /// registered (the caller should push a layer); `false` means coalescing
    /// applies and nothing should be pushed.
    pub fn register(&mut self, id: BarrierId) -> bool {
        self.in_flight.insert(id)
    }

    /// Clear `id` once its layer is redequeued at the matching priority.
    pub fn clear(&mut self, id: BarrierId) {
        self.in_flight.remove(&id);
    }

    /// `true` once every barrier this registry tracked has cleared — should
    /// hold after a full drain.
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}
