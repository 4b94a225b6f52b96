//! Common types for Crossmix
//!
//! Slot labels and the small numeric aliases shared by every module.

/// Number of stream slots in a mix (A/left and B/right)
pub const NUM_SLOTS: usize = 2;

/// Playback position in seconds, as reported by player handles
pub type Seconds = f64;

/// Slot identifiers
///
/// Slot A is the left stream, slot B the right one. A fader at 0.0 favors A,
/// a fader at 1.0 favors B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum SlotLabel {
    A = 0,
    B = 1,
}

impl SlotLabel {
    /// Get all slots in order
    pub const ALL: [SlotLabel; NUM_SLOTS] = [SlotLabel::A, SlotLabel::B];

    /// Array index of this slot
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the display name of this slot
    pub fn name(&self) -> &'static str {
        match self {
            SlotLabel::A => "Left",
            SlotLabel::B => "Right",
        }
    }
}

impl std::fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotLabel::A => write!(f, "A"),
            SlotLabel::B => write!(f, "B"),
        }
    }
}

/// Clamp a control value to the unit range
///
/// NaN and infinities collapse to 0.0 so a corrupt input can never push a
/// fader outside [0, 1].
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_indices_follow_order() {
        for (idx, label) in SlotLabel::ALL.into_iter().enumerate() {
            assert_eq!(label.index(), idx);
        }
        assert_eq!(SlotLabel::A.to_string(), "A");
        assert_eq!(SlotLabel::B.name(), "Right");
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(f32::NAN), 0.0);
        assert_eq!(clamp_unit(f32::INFINITY), 0.0);
    }
}
