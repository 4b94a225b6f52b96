//! Mix session - slots, faders, template and play intent
//!
//! - [`MixSession`]: the state of one open mix
//! - [`ReadinessTracker`]: per-slot readiness flags
//! - [`FaderPair`] / [`Template`]: crossfader positions and blend modes
//! - [`RevertTimer`] / [`LabelVisibility`]: session-owned delayed actions

mod fader;
mod readiness;
mod state;
mod timer;

pub use fader::{fader_to_percent, percent_to_fader, FaderPair, Template};
pub use readiness::{ReadinessTracker, SlotReadiness, StreamSlot};
pub use state::MixSession;
pub use timer::{LabelVisibility, RevertTimer};
