//! Mix session state
//!
//! One `MixSession` exists per open mix. It holds the two stream slots,
//! the fader pair, the active template and the play/pause intent. It is
//! plain data: the controller mutates it in response to user events and
//! the crossfade engine reads it on every render pass.

use super::fader::{FaderPair, Template};
use super::readiness::{ReadinessTracker, SlotReadiness, StreamSlot};
use crate::source::SourceInfo;
use crate::store::{NewMix, SavedMix, SlotRecord, StoreError, StoreResult};
use crate::types::{SlotLabel, NUM_SLOTS};

/// State of one open mix
#[derive(Debug, Clone, Default)]
pub struct MixSession {
    slots: ReadinessTracker,
    fader: FaderPair,
    template: Template,
    /// Requested play state; the handles' reported state lags behind it
    intent: bool,
    /// Preview sessions render video but never produce audio
    preview: bool,
    /// Id of the saved mix this session was loaded from
    saved_id: Option<u64>,
    title: Option<String>,
}

impl MixSession {
    /// Create an empty session: split template, faders centered, paused
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty preview session (audio always silent)
    pub fn preview() -> Self {
        Self {
            preview: true,
            ..Self::default()
        }
    }

    // =========================================================================
    // Faders and templates
    // =========================================================================

    /// Current fader pair
    pub fn fader(&self) -> FaderPair {
        self.fader
    }

    /// Replace the fader pair
    pub fn set_fader(&mut self, fader: FaderPair) {
        self.fader = fader;
    }

    /// Move the video fader (clamped)
    pub fn set_video_fader(&mut self, value: f32) {
        self.fader = self.fader.with_video(value);
    }

    /// Move the audio fader (clamped)
    pub fn set_audio_fader(&mut self, value: f32) {
        self.fader = self.fader.with_audio(value);
    }

    /// Active template
    pub fn template(&self) -> Template {
        self.template
    }

    /// Switch template and re-center both faders on its default
    ///
    /// Slots, readiness and intent are left alone.
    pub fn select_template(&mut self, template: Template) {
        log::info!(
            "MixSession: template {} -> {}, faders reset to {:.2}",
            self.template.name(),
            template.name(),
            template.default_fader()
        );
        self.template = template;
        self.fader = FaderPair::uniform(template.default_fader());
    }

    // =========================================================================
    // Slots
    // =========================================================================

    /// Assign a source to a slot
    ///
    /// Faders and intent are unchanged; the slot is not ready until its new
    /// handle signals readiness.
    pub fn assign_source(&mut self, label: SlotLabel, source: SourceInfo) {
        log::info!("MixSession: slot {} <- {} ({})", label, source.source_id, source.title);
        self.slots.assign(label, source);
    }

    /// Remove the source from a slot
    pub fn clear_slot(&mut self, label: SlotLabel) -> Option<StreamSlot> {
        self.slots.clear(label)
    }

    /// Slot contents, if populated
    pub fn slot(&self, label: SlotLabel) -> Option<&StreamSlot> {
        self.slots.slot(label)
    }

    /// Which slots hold a source
    pub fn populated(&self) -> [bool; NUM_SLOTS] {
        self.slots.populated()
    }

    /// Record that a slot's handle finished buffering
    pub fn mark_ready(&mut self, label: SlotLabel) {
        self.slots.mark_ready(label);
    }

    /// Readiness of one slot
    pub fn is_ready(&self, label: SlotLabel) -> bool {
        self.slots.is_ready(label)
    }

    /// Readiness snapshot for the coordinator
    pub fn readiness(&self) -> SlotReadiness {
        self.slots.snapshot()
    }

    // =========================================================================
    // Intent and lifecycle
    // =========================================================================

    /// Requested play state
    pub fn intent(&self) -> bool {
        self.intent
    }

    /// Set the requested play state
    pub fn set_intent(&mut self, playing: bool) {
        self.intent = playing;
    }

    /// Whether this is a silent preview session
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Saved mix id this session came from
    pub fn saved_id(&self) -> Option<u64> {
        self.saved_id
    }

    /// Mix title, once saved or loaded
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Start a new mix: empty slots, paused, faders centered
    ///
    /// The active template is kept.
    pub fn reset(&mut self) {
        log::info!("MixSession: reset to new mix");
        self.slots.clear_all();
        self.intent = false;
        self.fader = FaderPair::default();
        self.saved_id = None;
        self.title = None;
    }

    // =========================================================================
    // Persistence mapping
    // =========================================================================

    /// Rebuild a session from a saved record
    ///
    /// Stored integer percentages map back to the [0, 1] fader domain.
    /// Slots come back not-ready: their handles must buffer again.
    pub fn from_saved(record: &SavedMix) -> Self {
        let mut slots = ReadinessTracker::new();
        slots.assign(SlotLabel::A, record.slot_a.to_source());
        slots.assign(SlotLabel::B, record.slot_b.to_source());

        Self {
            slots,
            fader: FaderPair::from_percent(record.video_fader, record.audio_fader),
            template: Template::from_id(&record.template),
            intent: false,
            preview: false,
            saved_id: Some(record.id),
            title: Some(record.title.clone()),
        }
    }

    /// Build the record to persist for this session
    ///
    /// Both slots must be populated and the title must not be blank.
    pub fn to_new_mix(&self, title: &str, owner: u64) -> StoreResult<NewMix> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let slot_a = self.slot(SlotLabel::A).ok_or(StoreError::IncompleteMix(SlotLabel::A))?;
        let slot_b = self.slot(SlotLabel::B).ok_or(StoreError::IncompleteMix(SlotLabel::B))?;
        let (video_fader, audio_fader) = self.fader.to_percent();

        Ok(NewMix {
            title: title.to_string(),
            owner,
            slot_a: SlotRecord::from_source(&slot_a.source),
            slot_b: SlotRecord::from_source(&slot_b.source),
            video_fader,
            audio_fader,
            template: self.template.id().to_string(),
        })
    }

    /// Remember that this session is now backed by a saved record
    pub fn mark_saved(&mut self, id: u64, title: &str) {
        self.saved_id = Some(id);
        self.title = Some(title.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn loaded_session() -> MixSession {
        let mut session = MixSession::new();
        session.assign_source(SlotLabel::A, SourceInfo::from_id("dQw4w9WgXcQ"));
        session.assign_source(SlotLabel::B, SourceInfo::from_id("y6120QOlsfU"));
        session
    }

    #[test]
    fn test_new_session_defaults() {
        let session = MixSession::new();
        assert_eq!(session.template(), Template::Split);
        assert_eq!(session.fader(), FaderPair::uniform(0.5));
        assert!(!session.intent());
        assert_eq!(session.populated(), [false, false]);
    }

    #[test]
    fn test_split_to_overlay_resets_faders_keeps_slots() {
        let mut session = loaded_session();
        session.mark_ready(SlotLabel::A);
        session.set_fader(FaderPair::new(0.3, 0.8));

        session.select_template(Template::Overlay);

        assert_eq!(session.template(), Template::Overlay);
        assert_eq!(session.fader(), FaderPair::uniform(1.0));
        assert_eq!(session.slot(SlotLabel::A).map(StreamSlot::source_id), Some("dQw4w9WgXcQ"));
        assert_eq!(session.slot(SlotLabel::B).map(StreamSlot::source_id), Some("y6120QOlsfU"));
        assert!(session.is_ready(SlotLabel::A));
    }

    #[test]
    fn test_assign_keeps_fader_and_intent() {
        let mut session = loaded_session();
        session.mark_ready(SlotLabel::B);
        session.set_fader(FaderPair::new(0.1, 0.9));
        session.set_intent(true);

        session.assign_source(SlotLabel::B, SourceInfo::from_id("L_jWHffIx5E"));

        assert_eq!(session.fader(), FaderPair::new(0.1, 0.9));
        assert!(session.intent());
        assert!(!session.is_ready(SlotLabel::B));
    }

    #[test]
    fn test_fader_setters_clamp() {
        let mut session = MixSession::new();
        session.set_video_fader(1.7);
        session.set_audio_fader(-3.0);
        assert_eq!(session.fader().video(), 1.0);
        assert_eq!(session.fader().audio(), 0.0);
    }

    #[test]
    fn test_reset_keeps_template() {
        let mut session = loaded_session();
        session.select_template(Template::Overlay);
        session.set_intent(true);

        session.reset();

        assert_eq!(session.template(), Template::Overlay);
        assert_eq!(session.fader(), FaderPair::default());
        assert_eq!(session.populated(), [false, false]);
        assert!(!session.intent());
    }

    #[test]
    fn test_to_new_mix_requires_both_slots() {
        let mut session = MixSession::new();
        session.assign_source(SlotLabel::A, SourceInfo::from_id("dQw4w9WgXcQ"));
        assert!(matches!(
            session.to_new_mix("Late night", 1),
            Err(StoreError::IncompleteMix(SlotLabel::B))
        ));
    }

    #[test]
    fn test_to_new_mix_rejects_blank_title() {
        let session = loaded_session();
        assert!(matches!(session.to_new_mix("   ", 1), Err(StoreError::EmptyTitle)));
    }

    #[test]
    fn test_persist_and_reload_faders() {
        let mut session = loaded_session();
        session.set_fader(FaderPair::new(0.6, 0.6));

        let new_mix = session.to_new_mix("Sandstorm Rick", 7).unwrap();
        assert_eq!((new_mix.video_fader, new_mix.audio_fader), (60, 60));

        let saved = SavedMix::from_new(new_mix, 42, Utc::now());
        let reloaded = MixSession::from_saved(&saved);

        assert!((reloaded.fader().video() - 0.6).abs() <= 0.005);
        assert!((reloaded.fader().audio() - 0.6).abs() <= 0.005);
        assert_eq!(reloaded.template(), Template::Split);
        assert_eq!(reloaded.saved_id(), Some(42));
        assert_eq!(reloaded.title(), Some("Sandstorm Rick"));
        assert!(!reloaded.is_ready(SlotLabel::A));
    }
}
