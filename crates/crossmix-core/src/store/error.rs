//! Mix store error types

use thiserror::Error;

use crate::types::SlotLabel;

/// Errors that can occur while saving or loading mixes
#[derive(Error, Debug)]
pub enum StoreError {
    /// A mix needs a source in both slots to be saved
    #[error("Slot {0} has no source; both slots are required to save a mix")]
    IncompleteMix(SlotLabel),

    /// Titles must contain something other than whitespace
    #[error("Mix title is empty")]
    EmptyTitle,

    /// No mix with this id
    #[error("Mix not found: {0}")]
    NotFound(u64),

    /// Reading or writing the backing file failed
    #[error("Mix store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be (de)serialized
    #[error("Mix store format error: {0}")]
    Format(#[from] serde_yaml::Error),
}

/// Result type for mix store operations
pub type StoreResult<T> = Result<T, StoreError>;
