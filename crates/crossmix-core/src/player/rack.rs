//! Player rack - the shared table of attached handles
//!
//! The rendering layer owns the handles; the rack only references them.
//! Clones of a rack share the same table, so a slot cleared by the
//! controller is immediately visible to an in-flight start attempt.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::PlayerHandle;
use crate::types::{SlotLabel, NUM_SLOTS};

type SlotTable = [Option<Arc<dyn PlayerHandle>>; NUM_SLOTS];

/// Shared, cloneable table of one optional handle per slot
#[derive(Clone, Default)]
pub struct PlayerRack {
    slots: Arc<RwLock<SlotTable>>,
}

impl PlayerRack {
    /// Create an empty rack
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handle to a slot, returning the handle it replaced
    pub fn attach(
        &self,
        label: SlotLabel,
        handle: Arc<dyn PlayerHandle>,
    ) -> Option<Arc<dyn PlayerHandle>> {
        log::debug!("PlayerRack: attaching handle to slot {}", label);
        self.write()[label.index()].replace(handle)
    }

    /// Detach the handle from a slot
    pub fn detach(&self, label: SlotLabel) -> Option<Arc<dyn PlayerHandle>> {
        log::debug!("PlayerRack: detaching slot {}", label);
        self.write()[label.index()].take()
    }

    /// Get the handle attached to a slot
    pub fn get(&self, label: SlotLabel) -> Option<Arc<dyn PlayerHandle>> {
        self.read()[label.index()].clone()
    }

    /// Whether a slot has a handle attached
    pub fn is_attached(&self, label: SlotLabel) -> bool {
        self.read()[label.index()].is_some()
    }

    /// Whether `handle` is still the one attached to `label`
    ///
    /// A slot that was cleared or re-assigned to a new handle no longer
    /// holds the same instance, even if a handle is attached.
    pub fn holds(&self, label: SlotLabel, handle: &Arc<dyn PlayerHandle>) -> bool {
        self.read()[label.index()]
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, handle))
    }

    // A poisoned lock only means a panic happened elsewhere while the table
    // was held; the table itself is always a valid array of options.
    fn read(&self) -> RwLockReadGuard<'_, SlotTable> {
        self.slots.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SlotTable> {
        self.slots.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for PlayerRack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerRack")
            .field("a", &self.is_attached(SlotLabel::A))
            .field("b", &self.is_attached(SlotLabel::B))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::SimulatedPlayer;

    #[test]
    fn test_attach_detach() {
        let rack = PlayerRack::new();
        assert!(!rack.is_attached(SlotLabel::A));

        let handle: Arc<dyn PlayerHandle> = Arc::new(SimulatedPlayer::responsive());
        assert!(rack.attach(SlotLabel::A, handle.clone()).is_none());
        assert!(rack.is_attached(SlotLabel::A));
        assert!(!rack.is_attached(SlotLabel::B));

        assert!(rack.detach(SlotLabel::A).is_some());
        assert!(rack.get(SlotLabel::A).is_none());
    }

    #[test]
    fn test_clones_share_table() {
        let rack = PlayerRack::new();
        let view = rack.clone();
        let handle: Arc<dyn PlayerHandle> = Arc::new(SimulatedPlayer::responsive());
        rack.attach(SlotLabel::B, handle);
        assert!(view.is_attached(SlotLabel::B));
    }

    #[test]
    fn test_holds_detects_replacement() {
        let rack = PlayerRack::new();
        let first: Arc<dyn PlayerHandle> = Arc::new(SimulatedPlayer::responsive());
        let second: Arc<dyn PlayerHandle> = Arc::new(SimulatedPlayer::responsive());

        rack.attach(SlotLabel::A, first.clone());
        assert!(rack.holds(SlotLabel::A, &first));

        rack.attach(SlotLabel::A, second.clone());
        assert!(!rack.holds(SlotLabel::A, &first));
        assert!(rack.holds(SlotLabel::A, &second));
    }
}
