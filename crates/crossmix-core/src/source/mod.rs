//! Source resolution - free-form user input to a playable stream
//!
//! A mix slot holds a [`SourceInfo`]: the opaque id the player adapter
//! loads plus the metadata shown next to the slot. Catalog search lives
//! outside this crate; [`LinkResolver`] only understands links and bare
//! ids.

mod link;

pub use link::{parse_start_offset, LinkResolver};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Seconds;

/// Fallback title when a source carries no metadata
pub const UNKNOWN_TITLE: &str = "Video";
/// Fallback channel name when a source carries no metadata
pub const UNKNOWN_CHANNEL: &str = "Channel";

/// A resolved stream and its display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub source_id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    /// Position to start from, when the link carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset_seconds: Option<Seconds>,
}

impl SourceInfo {
    /// Source with placeholder metadata for a bare id
    pub fn from_id(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            title: UNKNOWN_TITLE.to_string(),
            channel_title: UNKNOWN_CHANNEL.to_string(),
            thumbnail_url: thumbnail_url(source_id),
            start_offset_seconds: None,
        }
    }

    /// Builder: set the display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder: set the channel name
    pub fn with_channel(mut self, channel_title: impl Into<String>) -> Self {
        self.channel_title = channel_title.into();
        self
    }

    /// Builder: set the start offset
    pub fn with_start_offset(mut self, seconds: Option<Seconds>) -> Self {
        self.start_offset_seconds = seconds;
        self
    }
}

/// Medium-quality thumbnail for a stream id
pub fn thumbnail_url(source_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/mqdefault.jpg", source_id)
}

/// Errors from source resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No source found for: {0}")]
    NotFound(String),

    #[error("Empty input")]
    EmptyInput,
}

/// Result type for source resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Turns user input into a [`SourceInfo`]
pub trait SourceResolver {
    fn resolve(&self, input: &str) -> ResolveResult<SourceInfo>;
}
