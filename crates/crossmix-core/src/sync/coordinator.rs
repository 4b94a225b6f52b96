//! Async driver for the start protocol

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::machine::{Directive, StartInput, StartMachine, StartOutcome};
use super::{Clock, SyncError, SyncResult, SyncTiming, TokioClock};
use crate::player::{PlayerHandle, PlayerRack};
use crate::session::SlotReadiness;
use crate::types::SlotLabel;

/// Starts and stops both slots together
///
/// Requests are last-wins. Every request (start or stop) takes a new
/// generation number; an in-flight start that sees a newer generation at
/// one of its checkpoints pauses its handles and returns `Aborted`.
/// Handles are looked up in the shared rack at every checkpoint, so a slot
/// cleared mid-attempt is noticed there too.
pub struct SyncCoordinator<C: Clock = TokioClock> {
    rack: PlayerRack,
    clock: C,
    timing: SyncTiming,
    generation: AtomicU64,
}

impl SyncCoordinator<TokioClock> {
    /// Coordinator on the tokio clock
    pub fn new(rack: PlayerRack, timing: SyncTiming) -> Self {
        Self::with_clock(rack, timing, TokioClock)
    }
}

impl<C: Clock> SyncCoordinator<C> {
    pub fn with_clock(rack: PlayerRack, timing: SyncTiming, clock: C) -> Self {
        Self {
            rack,
            clock,
            timing,
            generation: AtomicU64::new(0),
        }
    }

    pub fn rack(&self) -> &PlayerRack {
        &self.rack
    }

    pub fn timing(&self) -> SyncTiming {
        self.timing
    }

    /// Supersede any in-flight start without issuing a new request
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Start or stop both slots
    ///
    /// Starting needs both slots ready and both handles attached; otherwise
    /// `NotReady` is returned before any command is sent. Stopping pauses
    /// every attached handle and reports missing ones as `PartialStop`.
    pub async fn request_playback(
        &self,
        should_play: bool,
        readiness: SlotReadiness,
    ) -> SyncResult<()> {
        if should_play {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.start(generation, readiness).await
        } else {
            self.stop()
        }
    }

    /// Supersede any in-flight start and pause every attached handle
    pub fn stop(&self) -> SyncResult<()> {
        self.cancel();
        let mut missing = Vec::new();
        for label in SlotLabel::ALL {
            match self.rack.get(label) {
                Some(handle) => handle.pause(),
                None => missing.push(label),
            }
        }

        if missing.is_empty() {
            log::info!("SyncCoordinator: stopped both slots");
            Ok(())
        } else {
            log::warn!("SyncCoordinator: stop skipped empty slot(s) {:?}", missing);
            Err(SyncError::PartialStop { missing })
        }
    }

    async fn start(&self, generation: u64, readiness: SlotReadiness) -> SyncResult<()> {
        let (a, b) = match (self.rack.get(SlotLabel::A), self.rack.get(SlotLabel::B)) {
            (Some(a), Some(b)) if readiness.both_ready() => (a, b),
            (a, b) => {
                let missing = [(SlotLabel::A, a.is_none()), (SlotLabel::B, b.is_none())]
                    .into_iter()
                    .filter_map(|(label, absent)| absent.then_some(label))
                    .collect();
                let err = SyncError::NotReady {
                    not_ready: readiness.not_ready(),
                    missing,
                };
                log::warn!("SyncCoordinator: {}", err);
                return Err(err);
            }
        };

        log::info!(
            "SyncCoordinator: starting (generation {}, a at {:.2}s, b at {:.2}s)",
            generation,
            a.current_time(),
            b.current_time()
        );

        let mut machine = StartMachine::new(self.timing);
        let mut input = StartInput::Begin {
            position_a: a.current_time(),
            position_b: b.current_time(),
        };

        loop {
            let directive = machine.step(input);
            input = match directive {
                Directive::Seek(position) => {
                    log::debug!("SyncCoordinator: aligning both to {:.2}s", position);
                    a.seek(position);
                    b.seek(position);
                    StartInput::Done
                }
                Directive::Sleep(duration) => {
                    self.clock.sleep(duration).await;
                    StartInput::Done
                }
                Directive::Play => {
                    a.play();
                    b.play();
                    StartInput::Done
                }
                Directive::Pause => {
                    self.pause_held(&a, &b);
                    StartInput::Done
                }
                Directive::Unmute => {
                    a.unmute();
                    b.unmute();
                    StartInput::Done
                }
                Directive::Observe => {
                    let observed = StartInput::Observed {
                        a: a.state(),
                        b: b.state(),
                    };
                    log::debug!("SyncCoordinator: {:?}", observed);
                    observed
                }
                Directive::Finish(outcome) => return self.finish(outcome, machine.attempts()),
            };

            input = self.checkpoint(generation, &a, &b).unwrap_or(input);
        }
    }

    /// Interrupting input if this attempt was superseded or lost a handle
    fn checkpoint(
        &self,
        generation: u64,
        a: &Arc<dyn PlayerHandle>,
        b: &Arc<dyn PlayerHandle>,
    ) -> Option<StartInput> {
        if self.generation.load(Ordering::SeqCst) != generation {
            return Some(StartInput::Cancelled);
        }
        if !self.rack.holds(SlotLabel::A, a) || !self.rack.holds(SlotLabel::B, b) {
            return Some(StartInput::Lost);
        }
        None
    }

    /// Pause whichever of the attempt's handles are still attached
    fn pause_held(&self, a: &Arc<dyn PlayerHandle>, b: &Arc<dyn PlayerHandle>) {
        for (label, handle) in [(SlotLabel::A, a), (SlotLabel::B, b)] {
            if self.rack.holds(label, handle) {
                handle.pause();
            } else {
                log::debug!("SyncCoordinator: slot {} handle gone, not pausing", label);
            }
        }
    }

    fn finish(&self, outcome: StartOutcome, attempts: u32) -> SyncResult<()> {
        match outcome {
            StartOutcome::Started => {
                log::info!("SyncCoordinator: both slots playing ({} failed attempts)", attempts);
                Ok(())
            }
            StartOutcome::Exhausted { attempts } => {
                log::warn!("SyncCoordinator: start failed after {} attempts", attempts);
                Err(SyncError::StartFailed { attempts })
            }
            StartOutcome::Aborted => {
                log::info!("SyncCoordinator: start aborted");
                Err(SyncError::Aborted)
            }
        }
    }
}
