//! Player handles - the opaque media instances a mix controls
//!
//! A handle is whatever actually renders a stream (an embedded web player,
//! a native decoder, a test double). The coordinator and the crossfade
//! output step only ever talk to the [`PlayerHandle`] interface; each
//! player technology provides an adapter that implements it.
//!
//! Commands are fire-and-forget: `play()` returning does not mean the
//! player is playing, only that the request was delivered. Observed state
//! comes from [`PlayerHandle::state`].

mod rack;
pub mod simulated;

pub use rack::PlayerRack;
pub use simulated::{PlayerCommand, SimulatedBehavior, SimulatedPlayer};

use crate::types::Seconds;

/// Reported state of a player handle
///
/// Mirrors the state set exposed by embedded web players. Anything other
/// than `Playing` counts as "not started yet" while the coordinator polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    /// Whether the handle confirmed playback
    #[inline]
    pub fn is_playing(self) -> bool {
        matches!(self, PlayerState::Playing)
    }
}

/// Control surface of one media instance
///
/// All methods take `&self`: handles are shared between the rack, the
/// coordinator and the rendering layer, and adapters keep their own
/// interior state.
pub trait PlayerHandle: Send + Sync {
    /// Request playback
    fn play(&self);
    /// Request pause (always deliverable)
    fn pause(&self);
    /// Request a seek to an absolute position
    fn seek(&self, seconds: Seconds);
    /// Current playback position
    fn current_time(&self) -> Seconds;
    /// Current reported state
    fn state(&self) -> PlayerState;
    /// Set output gain (0.0 to 1.0)
    fn set_volume(&self, volume: f32);
    /// Silence output without touching the gain
    fn mute(&self);
    /// Restore output at the current gain
    fn unmute(&self);
}
