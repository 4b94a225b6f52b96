//! Output application - push mapped gains to the attached handles

use super::MixOutput;
use crate::player::PlayerRack;
use crate::types::SlotLabel;

/// Set each attached handle's volume from a mix output
///
/// Only gains are written here. Mute state belongs to the sync
/// coordinator, which unmutes once a synchronized start is confirmed.
pub fn apply_output(output: &MixOutput, rack: &PlayerRack) {
    for label in SlotLabel::ALL {
        if let Some(handle) = rack.get(label) {
            handle.set_volume(output.volume(label));
        }
    }
}
