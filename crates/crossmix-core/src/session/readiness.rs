//! Readiness tracking for the two stream slots
//!
//! The tracker owns the [`StreamSlot`]s of a session. A slot becomes ready
//! once its player handle signals it has buffered enough to take commands;
//! assigning a new source to the slot drops it back to not-ready.

use crate::source::SourceInfo;
use crate::types::{Seconds, SlotLabel, NUM_SLOTS};

/// One populated stream position
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSlot {
    pub label: SlotLabel,
    pub source: SourceInfo,
    pub start_offset_seconds: Option<Seconds>,
    ready: bool,
}

impl StreamSlot {
    /// Create a not-yet-ready slot for a resolved source
    pub fn new(label: SlotLabel, source: SourceInfo) -> Self {
        let start_offset_seconds = source.start_offset_seconds;
        Self {
            label,
            source,
            start_offset_seconds,
            ready: false,
        }
    }

    /// Opaque stream identifier
    pub fn source_id(&self) -> &str {
        &self.source.source_id
    }

    /// Whether the handle for this slot finished initial buffering
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Copyable readiness snapshot handed to the sync coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotReadiness([bool; NUM_SLOTS]);

impl SlotReadiness {
    /// Build a snapshot from per-slot flags
    pub fn new(a: bool, b: bool) -> Self {
        Self([a, b])
    }

    /// Readiness of one slot
    pub fn is_ready(&self, label: SlotLabel) -> bool {
        self.0[label.index()]
    }

    /// Whether both slots are ready
    pub fn both_ready(&self) -> bool {
        self.0.iter().all(|ready| *ready)
    }

    /// Slots that are not ready
    pub fn not_ready(&self) -> Vec<SlotLabel> {
        SlotLabel::ALL
            .into_iter()
            .filter(|label| !self.is_ready(*label))
            .collect()
    }
}

/// Per-slot readiness flag store
#[derive(Debug, Clone, Default)]
pub struct ReadinessTracker {
    slots: [Option<StreamSlot>; NUM_SLOTS],
}

impl ReadinessTracker {
    /// Create a tracker with both slots empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a source into a slot, replacing any previous one
    ///
    /// The new slot starts not-ready until its handle signals readiness.
    pub fn assign(&mut self, label: SlotLabel, source: SourceInfo) -> Option<StreamSlot> {
        self.slots[label.index()].replace(StreamSlot::new(label, source))
    }

    /// Empty a slot
    pub fn clear(&mut self, label: SlotLabel) -> Option<StreamSlot> {
        self.slots[label.index()].take()
    }

    /// Empty both slots
    pub fn clear_all(&mut self) {
        self.slots = Default::default();
    }

    /// Record that a slot's handle is ready
    ///
    /// Idempotent. A ready signal for an empty slot is stale (the source
    /// was cleared while buffering) and is ignored.
    pub fn mark_ready(&mut self, label: SlotLabel) {
        match self.slots[label.index()].as_mut() {
            Some(slot) => {
                if !slot.ready {
                    log::debug!("ReadinessTracker: slot {} ready ({})", label, slot.source_id());
                }
                slot.ready = true;
            }
            None => log::debug!("ReadinessTracker: ignoring ready signal for empty slot {}", label),
        }
    }

    /// Readiness of one slot; an empty slot is never ready
    pub fn is_ready(&self, label: SlotLabel) -> bool {
        self.slots[label.index()]
            .as_ref()
            .is_some_and(StreamSlot::is_ready)
    }

    /// Snapshot of both flags
    pub fn snapshot(&self) -> SlotReadiness {
        SlotReadiness::new(self.is_ready(SlotLabel::A), self.is_ready(SlotLabel::B))
    }

    /// The slot at a label, if populated
    pub fn slot(&self, label: SlotLabel) -> Option<&StreamSlot> {
        self.slots[label.index()].as_ref()
    }

    /// Which slots hold a source
    pub fn populated(&self) -> [bool; NUM_SLOTS] {
        [self.slots[0].is_some(), self.slots[1].is_some()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str) -> SourceInfo {
        SourceInfo::from_id(id)
    }

    #[test]
    fn test_empty_slot_never_ready() {
        let mut tracker = ReadinessTracker::new();
        tracker.mark_ready(SlotLabel::A);
        assert!(!tracker.is_ready(SlotLabel::A));
        assert!(tracker.slot(SlotLabel::A).is_none());
    }

    #[test]
    fn test_mark_ready_is_idempotent() {
        let mut tracker = ReadinessTracker::new();
        tracker.assign(SlotLabel::B, source("dQw4w9WgXcQ"));
        assert!(!tracker.is_ready(SlotLabel::B));

        tracker.mark_ready(SlotLabel::B);
        tracker.mark_ready(SlotLabel::B);
        assert!(tracker.is_ready(SlotLabel::B));
        assert!(!tracker.is_ready(SlotLabel::A));
    }

    #[test]
    fn test_reassign_resets_ready() {
        let mut tracker = ReadinessTracker::new();
        tracker.assign(SlotLabel::A, source("dQw4w9WgXcQ"));
        tracker.mark_ready(SlotLabel::A);

        let previous = tracker.assign(SlotLabel::A, source("y6120QOlsfU"));
        assert_eq!(previous.map(|s| s.source.source_id), Some("dQw4w9WgXcQ".to_string()));
        assert!(!tracker.is_ready(SlotLabel::A));
    }

    #[test]
    fn test_snapshot() {
        let mut tracker = ReadinessTracker::new();
        tracker.assign(SlotLabel::A, source("dQw4w9WgXcQ"));
        tracker.assign(SlotLabel::B, source("y6120QOlsfU"));
        tracker.mark_ready(SlotLabel::A);

        let snapshot = tracker.snapshot();
        assert!(!snapshot.both_ready());
        assert_eq!(snapshot.not_ready(), vec![SlotLabel::B]);

        tracker.mark_ready(SlotLabel::B);
        assert!(tracker.snapshot().both_ready());
        assert_eq!(tracker.populated(), [true, true]);
    }
}
