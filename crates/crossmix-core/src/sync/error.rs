//! Sync coordinator error types

use thiserror::Error;

use crate::types::SlotLabel;

/// Errors from a playback request
///
/// All of them are recoverable: the caller drops its play intent, tells the
/// user and may try again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Start requested before both slots were ready and attached
    #[error("Not ready to start (not ready: [{}], no handle: [{}])", join(.not_ready), join(.missing))]
    NotReady {
        not_ready: Vec<SlotLabel>,
        missing: Vec<SlotLabel>,
    },

    /// Both handles never reported playing within the retry budget
    #[error("Failed to start both streams after {attempts} attempts")]
    StartFailed { attempts: u32 },

    /// A newer request superseded this one, or a handle went away
    #[error("Start attempt aborted")]
    Aborted,

    /// Stop reached only some slots; the attached ones were paused
    #[error("Stopped with no handle in slot(s): [{}]", join(.missing))]
    PartialStop { missing: Vec<SlotLabel> },
}

fn join(labels: &[SlotLabel]) -> String {
    labels.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(", ")
}

/// Result type for playback requests
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SyncError::NotReady {
            not_ready: vec![SlotLabel::B],
            missing: vec![],
        };
        assert_eq!(err.to_string(), "Not ready to start (not ready: [B], no handle: [])");

        let err = SyncError::PartialStop {
            missing: vec![SlotLabel::A, SlotLabel::B],
        };
        assert_eq!(err.to_string(), "Stopped with no handle in slot(s): [A, B]");
    }
}
