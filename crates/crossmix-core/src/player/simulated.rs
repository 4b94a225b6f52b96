//! In-process player adapter with scripted behavior
//!
//! `SimulatedPlayer` stands in for a real media instance. It records every
//! command it receives and answers state queries according to a
//! [`SimulatedBehavior`], which makes stalls and slow starts reproducible
//! without a network or a decoder. The headless player binary and the
//! test-suite both drive sessions with it.

use std::sync::{Mutex, MutexGuard};

use super::{PlayerHandle, PlayerState};
use crate::types::Seconds;

/// How a simulated player reacts to `play()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedBehavior {
    /// Reports `Playing` as soon as play is requested
    Responsive,
    /// Reports `Buffering` forever after play is requested
    Stalled,
    /// Reports `Buffering` for this many state reads, then `Playing`
    DelayedStart { polls: u32 },
}

/// A command received by a simulated player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Seek(Seconds),
    SetVolume(f32),
    Mute,
    Unmute,
}

impl PlayerCommand {
    /// Whether this is a transport command (play/pause/seek)
    pub fn is_transport(&self) -> bool {
        matches!(self, PlayerCommand::Play | PlayerCommand::Pause | PlayerCommand::Seek(_))
    }
}

#[derive(Debug)]
struct SimState {
    behavior: SimulatedBehavior,
    state: PlayerState,
    position: Seconds,
    volume: f32,
    muted: bool,
    /// State reads remaining before a delayed start reports `Playing`
    pending_polls: u32,
    log: Vec<PlayerCommand>,
}

/// Scripted player handle
#[derive(Debug)]
pub struct SimulatedPlayer {
    inner: Mutex<SimState>,
}

impl SimulatedPlayer {
    /// Create a cued player at position 0 with the given behavior
    pub fn new(behavior: SimulatedBehavior) -> Self {
        Self {
            inner: Mutex::new(SimState {
                behavior,
                state: PlayerState::Cued,
                position: 0.0,
                volume: 1.0,
                muted: false,
                pending_polls: 0,
                log: Vec::new(),
            }),
        }
    }

    /// Player that starts immediately
    pub fn responsive() -> Self {
        Self::new(SimulatedBehavior::Responsive)
    }

    /// Player that never leaves buffering
    pub fn stalled() -> Self {
        Self::new(SimulatedBehavior::Stalled)
    }

    /// Player that needs `polls` state reads before it plays
    pub fn delayed(polls: u32) -> Self {
        Self::new(SimulatedBehavior::DelayedStart { polls })
    }

    /// Builder: start at a given position
    pub fn at_position(self, seconds: Seconds) -> Self {
        self.lock().position = seconds;
        self
    }

    /// Change behavior for subsequent play requests
    pub fn set_behavior(&self, behavior: SimulatedBehavior) {
        self.lock().behavior = behavior;
    }

    /// Move the playhead forward, as if playback progressed
    pub fn advance(&self, seconds: Seconds) {
        let mut inner = self.lock();
        if inner.state == PlayerState::Playing {
            inner.position += seconds;
        }
    }

    /// Snapshot of all commands received so far
    pub fn commands(&self) -> Vec<PlayerCommand> {
        self.lock().log.clone()
    }

    /// Number of received commands matching a predicate
    pub fn count(&self, predicate: impl Fn(&PlayerCommand) -> bool) -> usize {
        self.lock().log.iter().filter(|c| predicate(c)).count()
    }

    /// Current gain
    pub fn volume(&self) -> f32 {
        self.lock().volume
    }

    /// Whether output is muted
    pub fn is_muted(&self) -> bool {
        self.lock().muted
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlayerHandle for SimulatedPlayer {
    fn play(&self) {
        let mut inner = self.lock();
        inner.log.push(PlayerCommand::Play);
        match inner.behavior {
            SimulatedBehavior::Responsive => inner.state = PlayerState::Playing,
            SimulatedBehavior::Stalled => inner.state = PlayerState::Buffering,
            SimulatedBehavior::DelayedStart { polls } => {
                inner.pending_polls = polls;
                inner.state = if polls == 0 {
                    PlayerState::Playing
                } else {
                    PlayerState::Buffering
                };
            }
        }
    }

    fn pause(&self) {
        let mut inner = self.lock();
        inner.log.push(PlayerCommand::Pause);
        inner.pending_polls = 0;
        inner.state = PlayerState::Paused;
    }

    fn seek(&self, seconds: Seconds) {
        let mut inner = self.lock();
        inner.log.push(PlayerCommand::Seek(seconds));
        inner.position = seconds.max(0.0);
    }

    fn current_time(&self) -> Seconds {
        self.lock().position
    }

    fn state(&self) -> PlayerState {
        let mut inner = self.lock();
        if inner.state == PlayerState::Buffering && inner.pending_polls > 0 {
            inner.pending_polls -= 1;
            if inner.pending_polls == 0 {
                inner.state = PlayerState::Playing;
            }
        }
        inner.state
    }

    fn set_volume(&self, volume: f32) {
        let mut inner = self.lock();
        inner.log.push(PlayerCommand::SetVolume(volume));
        inner.volume = volume.clamp(0.0, 1.0);
    }

    fn mute(&self) {
        let mut inner = self.lock();
        inner.log.push(PlayerCommand::Mute);
        inner.muted = true;
    }

    fn unmute(&self) {
        let mut inner = self.lock();
        inner.log.push(PlayerCommand::Unmute);
        inner.muted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responsive_plays_immediately() {
        let player = SimulatedPlayer::responsive();
        assert_eq!(player.state(), PlayerState::Cued);
        player.play();
        assert_eq!(player.state(), PlayerState::Playing);
        player.pause();
        assert_eq!(player.state(), PlayerState::Paused);
    }

    #[test]
    fn test_stalled_never_plays() {
        let player = SimulatedPlayer::stalled();
        player.play();
        for _ in 0..100 {
            assert_eq!(player.state(), PlayerState::Buffering);
        }
    }

    #[test]
    fn test_delayed_start_counts_reads() {
        let player = SimulatedPlayer::delayed(3);
        player.play();
        assert_eq!(player.state(), PlayerState::Buffering);
        assert_eq!(player.state(), PlayerState::Buffering);
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_command_log() {
        let player = SimulatedPlayer::responsive().at_position(12.5);
        player.seek(10.0);
        player.play();
        player.set_volume(0.4);
        player.mute();

        assert_eq!(player.current_time(), 10.0);
        assert_eq!(
            player.commands(),
            vec![
                PlayerCommand::Seek(10.0),
                PlayerCommand::Play,
                PlayerCommand::SetVolume(0.4),
                PlayerCommand::Mute,
            ]
        );
        assert_eq!(player.count(PlayerCommand::is_transport), 2);
        assert!(player.is_muted());
    }

    #[test]
    fn test_advance_only_while_playing() {
        let player = SimulatedPlayer::responsive();
        player.advance(5.0);
        assert_eq!(player.current_time(), 0.0);
        player.play();
        player.advance(5.0);
        assert_eq!(player.current_time(), 5.0);
    }
}
