//! The start protocol as a pure state machine
//!
//! The machine never touches a player or a clock. Each call to
//! [`StartMachine::step`] takes the result of the previous directive and
//! returns the next one, so the whole protocol (including retries and
//! cancellation) can be walked through synchronously in tests.

use std::time::Duration;

use super::SyncTiming;
use crate::player::PlayerState;
use crate::types::Seconds;

/// Where the machine is in the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPhase {
    Idle,
    /// Seeks issued; `settling` once the settle wait was requested
    Seeking { settling: bool },
    /// Play issued to both handles
    Starting,
    /// Checking states; `polls` waits spent in this attempt
    Polling { polls: u32, sleeping: bool },
    /// Attempt failed; `paused` once both handles were paused
    Backoff { paused: bool },
    Succeeded,
    Failed,
    Aborted,
}

impl StartPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, StartPhase::Succeeded | StartPhase::Failed | StartPhase::Aborted)
    }
}

/// What the driver reports back to the machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartInput {
    /// Start request with both handles' current positions
    Begin { position_a: Seconds, position_b: Seconds },
    /// The previous directive was carried out
    Done,
    /// Answer to [`Directive::Observe`]
    Observed { a: PlayerState, b: PlayerState },
    /// A handle was detached or replaced
    Lost,
    /// A newer request superseded this one
    Cancelled,
}

/// What the driver must do next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    /// Seek both handles to this position
    Seek(Seconds),
    Sleep(Duration),
    /// Play both handles
    Play,
    /// Pause every handle that is still attached
    Pause,
    /// Unmute both handles
    Unmute,
    /// Read both handles' states
    Observe,
    /// Stop stepping
    Finish(StartOutcome),
}

/// How a start request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Exhausted { attempts: u32 },
    Aborted,
}

/// Bounded-retry start protocol
#[derive(Debug, Clone)]
pub struct StartMachine {
    timing: SyncTiming,
    phase: StartPhase,
    /// Failed attempts so far
    attempts: u32,
}

impl StartMachine {
    pub fn new(timing: SyncTiming) -> Self {
        Self {
            timing,
            phase: StartPhase::Idle,
            attempts: 0,
        }
    }

    pub fn phase(&self) -> StartPhase {
        self.phase
    }

    /// Failed attempts so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Advance the protocol by one directive
    pub fn step(&mut self, input: StartInput) -> Directive {
        use StartInput::*;
        use StartPhase::*;

        if self.phase.is_terminal() {
            return Directive::Finish(self.outcome());
        }

        match (self.phase, input) {
            (_, Cancelled) | (_, Lost) => {
                log::info!("StartMachine: aborting ({:?}) in {:?}", input, self.phase);
                self.phase = Aborted;
                Directive::Pause
            }

            (Idle, Begin { position_a, position_b }) => {
                self.attempts = 0;
                self.phase = Seeking { settling: false };
                Directive::Seek(align_time(position_a, position_b))
            }

            (Seeking { settling: false }, Done) => {
                self.phase = Seeking { settling: true };
                Directive::Sleep(self.timing.settle_delay())
            }

            (Seeking { settling: true }, Done) | (Backoff { paused: true }, Done)
                if self.attempts < self.timing.max_retries || self.attempts == 0 =>
            {
                self.phase = Starting;
                Directive::Play
            }

            (Backoff { paused: true }, Done) => {
                log::warn!("StartMachine: giving up after {} attempts", self.attempts);
                self.phase = Failed;
                Directive::Finish(self.outcome())
            }

            (Starting, Done) => {
                self.phase = Polling { polls: 0, sleeping: false };
                Directive::Observe
            }

            (Polling { polls, sleeping: false }, Observed { a, b }) => {
                if a.is_playing() && b.is_playing() {
                    log::debug!("StartMachine: both playing after {} polls", polls);
                    self.phase = Succeeded;
                    Directive::Unmute
                } else if polls < self.timing.max_polls {
                    self.phase = Polling { polls: polls + 1, sleeping: true };
                    Directive::Sleep(self.timing.poll_interval())
                } else {
                    log::warn!(
                        "StartMachine: attempt {} timed out (a={:?}, b={:?})",
                        self.attempts + 1,
                        a,
                        b
                    );
                    self.phase = Backoff { paused: false };
                    Directive::Pause
                }
            }

            (Polling { polls, sleeping: true }, Done) => {
                self.phase = Polling { polls, sleeping: false };
                Directive::Observe
            }

            (Backoff { paused: false }, Done) => {
                self.attempts += 1;
                self.phase = Backoff { paused: true };
                Directive::Sleep(self.timing.backoff_delay())
            }

            (phase, input) => {
                log::warn!("StartMachine: unexpected {:?} in {:?}, aborting", input, phase);
                self.phase = Aborted;
                Directive::Pause
            }
        }
    }

    fn outcome(&self) -> StartOutcome {
        match self.phase {
            StartPhase::Succeeded => StartOutcome::Started,
            StartPhase::Failed => StartOutcome::Exhausted { attempts: self.attempts },
            _ => StartOutcome::Aborted,
        }
    }
}

/// Position both handles are aligned to: the earlier of the two
///
/// Unreadable positions (negative or non-finite) count as the start.
fn align_time(a: Seconds, b: Seconds) -> Seconds {
    let sane = |t: Seconds| if t.is_finite() && t > 0.0 { t } else { 0.0 };
    sane(a).min(sane(b))
}
