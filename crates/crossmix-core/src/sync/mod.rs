//! Synchronized start of both slots
//!
//! Two independently buffering players rarely start together on their
//! own. Starting a mix therefore goes through a small protocol:
//!
//! 1. Seek both handles to the earlier of their two positions
//! 2. Wait for the seeks to settle
//! 3. Play both, then poll until both report `Playing`
//! 4. On timeout pause both, back off and try again (bounded)
//! 5. Unmute both once playback is confirmed
//!
//! [`StartMachine`] is the protocol as a pure state machine.
//! [`SyncCoordinator`] drives it against the player rack and a [`Clock`].

mod clock;
mod coordinator;
mod error;
mod machine;
mod timing;

pub use clock::{Clock, TokioClock};
pub use coordinator::SyncCoordinator;
pub use error::{SyncError, SyncResult};
pub use machine::{Directive, StartInput, StartMachine, StartOutcome, StartPhase};
pub use timing::SyncTiming;
