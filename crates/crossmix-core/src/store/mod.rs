//! Saved mixes
//!
//! A saved mix is the persisted form of a session: both slot sources,
//! the fader positions as integer percentages, the template id and a few
//! counters. [`MixStore`] is the storage seam; [`YamlMixStore`] keeps
//! everything in one YAML document.

mod error;
mod yaml;

pub use error::{StoreError, StoreResult};
pub use yaml::YamlMixStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::{thumbnail_url, SourceInfo, UNKNOWN_CHANNEL, UNKNOWN_TITLE};

/// Persisted slot source
///
/// Only the id is required; metadata is optional so that hand-written or
/// older records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
}

impl SlotRecord {
    pub fn from_source(source: &SourceInfo) -> Self {
        Self {
            source_id: source.source_id.clone(),
            title: Some(source.title.clone()),
            channel_title: Some(source.channel_title.clone()),
        }
    }

    /// Rebuild source info, filling in placeholder metadata
    ///
    /// Start offsets are not persisted; a reloaded mix starts from the
    /// beginning of both streams.
    pub fn to_source(&self) -> SourceInfo {
        SourceInfo {
            source_id: self.source_id.clone(),
            title: self.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            channel_title: self
                .channel_title
                .clone()
                .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
            thumbnail_url: thumbnail_url(&self.source_id),
            start_offset_seconds: None,
        }
    }
}

/// A mix about to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct NewMix {
    pub title: String,
    pub owner: u64,
    pub slot_a: SlotRecord,
    pub slot_b: SlotRecord,
    /// Video fader, percent (0-100)
    pub video_fader: u8,
    /// Audio fader, percent (0-100)
    pub audio_fader: u8,
    pub template: String,
}

/// A stored mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMix {
    pub id: u64,
    pub title: String,
    pub owner: u64,
    pub slot_a: SlotRecord,
    pub slot_b: SlotRecord,
    pub video_fader: u8,
    /// Records saved before the faders were split carry no audio value
    #[serde(default)]
    pub audio_fader: Option<u8>,
    pub template: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
}

impl SavedMix {
    /// Assign an id and creation time to a new mix
    pub fn from_new(mix: NewMix, id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: mix.title,
            owner: mix.owner,
            slot_a: mix.slot_a,
            slot_b: mix.slot_b,
            video_fader: mix.video_fader.min(100),
            audio_fader: Some(mix.audio_fader.min(100)),
            template: mix.template,
            view_count: 0,
            like_count: 0,
            created_at,
        }
    }
}

/// Storage for saved mixes
pub trait MixStore {
    /// Persist a new mix and return it with its id
    fn create(&mut self, mix: NewMix) -> StoreResult<SavedMix>;

    /// Fetch one mix
    fn get(&self, id: u64) -> StoreResult<SavedMix>;

    /// Newest mixes first
    fn list_recent(&self, limit: usize) -> StoreResult<Vec<SavedMix>>;

    /// Most liked mixes first; ties broken by recency
    fn list_most_liked(&self, limit: usize) -> StoreResult<Vec<SavedMix>>;

    fn delete(&mut self, id: u64) -> StoreResult<()>;

    /// Bump the view counter, returning the new count
    fn increment_views(&mut self, id: u64) -> StoreResult<u64>;

    /// Bump the like counter, returning the new count
    fn increment_likes(&mut self, id: u64) -> StoreResult<u64>;
}
