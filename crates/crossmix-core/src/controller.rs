//! Session controller - user events in, commands and notices out
//!
//! [`MixController`] owns the session state, the player rack and the sync
//! coordinator. Every event updates the session first, then recomputes
//! the mix output and pushes the new gains to the attached handles.
//! Failures never block: they reset the play intent where relevant and
//! queue a [`Notice`] for the UI to show.

use std::collections::VecDeque;
use std::sync::Arc;

use thiserror::Error;

use crate::auth::IdentityProvider;
use crate::config::CrossmixConfig;
use crate::crossfade::{apply_output, compute_mix_for, mix_labels, MixLabels, MixOutput};
use crate::player::{PlayerHandle, PlayerRack};
use crate::session::{LabelVisibility, MixSession, SlotReadiness, Template};
use crate::source::SourceInfo;
use crate::store::{MixStore, SavedMix, StoreError};
use crate::sync::{Clock, SyncCoordinator, SyncError, SyncResult, TokioClock};
use crate::types::SlotLabel;

// =============================================================================
// Notices and errors
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short, non-blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Errors from saving or loading a mix through the controller
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Sign in to save mixes")]
    NotAuthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// Controller
// =============================================================================

/// Drives one mix session
pub struct MixController<C: Clock = TokioClock> {
    session: MixSession,
    rack: PlayerRack,
    coordinator: Arc<SyncCoordinator<C>>,
    labels: LabelVisibility,
    output: MixOutput,
    notices: VecDeque<Notice>,
    /// Id of the latest playback request; older outcomes are stale
    playback_ticket: u64,
}

/// A playback request detached from the controller
///
/// Running it only needs the coordinator, so the controller stays free
/// for other events (stop, slot changes, a newer request) while a start
/// is in flight. Hand the outcome back with
/// [`MixController::complete_playback`].
pub struct PlaybackRequest<C: Clock = TokioClock> {
    ticket: u64,
    should_play: bool,
    readiness: SlotReadiness,
    coordinator: Arc<SyncCoordinator<C>>,
}

impl<C: Clock> PlaybackRequest<C> {
    pub async fn run(self) -> PlaybackOutcome {
        let result = self
            .coordinator
            .request_playback(self.should_play, self.readiness)
            .await;
        PlaybackOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// Result of a [`PlaybackRequest`]
#[derive(Debug)]
pub struct PlaybackOutcome {
    ticket: u64,
    pub result: SyncResult<()>,
}

impl MixController<TokioClock> {
    /// Controller for an empty session on the tokio clock
    pub fn new(config: &CrossmixConfig) -> Self {
        Self::with_clock(MixSession::new(), config, TokioClock)
    }
}

impl<C: Clock> MixController<C> {
    pub fn with_clock(session: MixSession, config: &CrossmixConfig, clock: C) -> Self {
        let rack = PlayerRack::new();
        let coordinator = Arc::new(SyncCoordinator::with_clock(rack.clone(), config.sync, clock));
        let output = compute_mix_for(session.fader(), session.template(), session.populated());

        Self {
            session,
            rack,
            coordinator,
            labels: LabelVisibility::new(config.labels.hide_delay()),
            output,
            notices: VecDeque::new(),
            playback_ticket: 0,
        }
    }

    pub fn session(&self) -> &MixSession {
        &self.session
    }

    pub fn rack(&self) -> &PlayerRack {
        &self.rack
    }

    /// Mix output as of the last state change
    pub fn output(&self) -> MixOutput {
        self.output
    }

    /// Fader percentage labels
    pub fn labels(&self) -> MixLabels {
        mix_labels(self.session.fader())
    }

    pub fn labels_visible(&self) -> bool {
        self.labels.is_visible()
    }

    /// Drain queued notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    // -------------------------------------------------------------------------
    // Faders and templates
    // -------------------------------------------------------------------------

    pub fn set_video_fader(&mut self, value: f32) {
        self.labels.show();
        self.session.set_video_fader(value);
        self.refresh();
    }

    pub fn set_audio_fader(&mut self, value: f32) {
        self.labels.show();
        self.session.set_audio_fader(value);
        self.refresh();
    }

    /// The user let go of the faders; labels fade after the delay
    pub fn release_faders(&mut self) {
        self.labels.hide();
    }

    pub fn select_template(&mut self, template: Template) {
        self.session.select_template(template);
        self.refresh();
    }

    // -------------------------------------------------------------------------
    // Slots
    // -------------------------------------------------------------------------

    /// Put a source into a slot, along with the handle that renders it
    pub fn assign_source(
        &mut self,
        label: SlotLabel,
        source: SourceInfo,
        handle: Arc<dyn PlayerHandle>,
    ) {
        self.session.assign_source(label, source);
        self.attach_handle(label, handle);
    }

    /// Attach a handle for the source already in a slot
    ///
    /// Handles join muted and stay muted until a synchronized start is
    /// confirmed. A link's start offset is applied here; a handle already in
    /// the slot is paused and released.
    pub fn attach_handle(&mut self, label: SlotLabel, handle: Arc<dyn PlayerHandle>) {
        handle.mute();
        if let Some(offset) = self.session.slot(label).and_then(|slot| slot.start_offset_seconds) {
            handle.seek(offset);
        }
        if let Some(previous) = self.rack.attach(label, Arc::clone(&handle)) {
            if !Arc::ptr_eq(&previous, &handle) {
                previous.pause();
            }
        }
        self.refresh();
    }

    /// Empty a slot, pausing and detaching its handle
    ///
    /// A start in flight notices the missing handle and aborts.
    pub fn clear_slot(&mut self, label: SlotLabel) {
        if let Some(handle) = self.rack.detach(label) {
            handle.pause();
        }
        self.session.clear_slot(label);
        self.refresh();
    }

    /// A slot's handle finished buffering
    pub fn mark_ready(&mut self, label: SlotLabel) {
        self.session.mark_ready(label);
    }

    /// Start a new mix: stop everything, empty both slots
    pub fn new_mix(&mut self) {
        self.release_handles();
        self.session.reset();
        self.refresh();
    }

    // -------------------------------------------------------------------------
    // Playback
    // -------------------------------------------------------------------------

    /// Record the play intent and prepare the request that carries it out
    ///
    /// Starting a new request makes every earlier one stale.
    pub fn begin_playback(&mut self, should_play: bool) -> PlaybackRequest<C> {
        self.playback_ticket += 1;
        self.session.set_intent(should_play);
        PlaybackRequest {
            ticket: self.playback_ticket,
            should_play,
            readiness: self.session.readiness(),
            coordinator: Arc::clone(&self.coordinator),
        }
    }

    /// Apply the outcome of a finished request
    ///
    /// When the latest request failed, the intent falls back to paused and
    /// a notice is queued. Outcomes of superseded requests change nothing.
    pub fn complete_playback(&mut self, outcome: PlaybackOutcome) -> SyncResult<()> {
        if outcome.ticket != self.playback_ticket {
            log::debug!(
                "MixController: ignoring stale playback outcome {} ({:?})",
                outcome.ticket,
                outcome.result
            );
            return outcome.result;
        }
        if let Err(e) = &outcome.result {
            self.session.set_intent(false);
            self.notices.push_back(playback_notice(e));
        }
        outcome.result
    }

    /// Ask for both slots to play or pause and wait for the outcome
    pub async fn request_playback(&mut self, should_play: bool) -> SyncResult<()> {
        let outcome = self.begin_playback(should_play).run().await;
        self.complete_playback(outcome)
    }

    /// Flip the play intent
    pub async fn toggle_playback(&mut self) -> SyncResult<()> {
        let should_play = !self.session.intent();
        self.request_playback(should_play).await
    }

    /// Pause now, superseding any start in flight
    ///
    /// Does not wait: the aborted start pauses its handles at its next
    /// checkpoint and its outcome is stale.
    pub fn stop(&mut self) -> SyncResult<()> {
        self.playback_ticket += 1;
        self.session.set_intent(false);
        let result = self.coordinator.stop();
        if let Err(e) = &result {
            self.notices.push_back(playback_notice(e));
        }
        result
    }

    /// Cancel playback and detach both handles, pausing them
    fn release_handles(&mut self) {
        self.playback_ticket += 1;
        self.coordinator.cancel();
        for label in SlotLabel::ALL {
            if let Some(handle) = self.rack.detach(label) {
                handle.pause();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Saved mixes
    // -------------------------------------------------------------------------

    /// Save the current session under `title`
    pub fn save_mix(
        &mut self,
        title: &str,
        identity: &dyn IdentityProvider,
        store: &mut dyn MixStore,
    ) -> Result<SavedMix, SaveError> {
        let result = self.try_save(title, identity, store);
        match &result {
            Ok(saved) => {
                self.session.mark_saved(saved.id, &saved.title);
                self.notices.push_back(Notice::info("Success", "Your mix has been saved"));
            }
            Err(e) => self.notices.push_back(save_notice(e)),
        }
        result
    }

    fn try_save(
        &self,
        title: &str,
        identity: &dyn IdentityProvider,
        store: &mut dyn MixStore,
    ) -> Result<SavedMix, SaveError> {
        let user = identity.current_user().ok_or(SaveError::NotAuthenticated)?;
        let mix = self.session.to_new_mix(title, user.id)?;
        log::info!("MixController: saving \"{}\" for {}", mix.title, user.username);
        Ok(store.create(mix)?)
    }

    /// Replace the session with a saved mix
    ///
    /// Counts as a view. Existing handles are detached; the caller attaches
    /// handles for the loaded sources, which then signal readiness.
    pub fn load_saved(&mut self, id: u64, store: &mut dyn MixStore) -> Result<SavedMix, SaveError> {
        let record = store.get(id)?;
        let views = store.increment_views(id)?;
        log::info!("MixController: loaded mix {} \"{}\" ({} views)", id, record.title, views);

        self.release_handles();
        self.session = MixSession::from_saved(&record);
        self.refresh();

        Ok(SavedMix {
            view_count: views,
            ..record
        })
    }

    /// Like a saved mix, returning the new like count
    pub fn like_mix(&mut self, id: u64, store: &mut dyn MixStore) -> Result<u64, SaveError> {
        Ok(store.increment_likes(id)?)
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    fn refresh(&mut self) {
        let output = compute_mix_for(
            self.session.fader(),
            self.session.template(),
            self.session.populated(),
        );
        self.output = if self.session.is_preview() {
            output.silenced()
        } else {
            output
        };
        apply_output(&self.output, &self.rack);
    }
}

fn playback_notice(err: &SyncError) -> Notice {
    match err {
        SyncError::NotReady { .. } => {
            Notice::error("Not ready", "Both videos need to finish loading before playing")
        }
        SyncError::StartFailed { .. } => {
            Notice::error("Playback failed", "Could not start both videos together. Please try again.")
        }
        SyncError::Aborted => Notice::info("Playback", "Start cancelled"),
        SyncError::PartialStop { .. } => Notice::info("Playback", err.to_string()),
    }
}

fn save_notice(err: &SaveError) -> Notice {
    match err {
        SaveError::NotAuthenticated => Notice::error("Sign in required", "Sign in to save mixes"),
        SaveError::Store(StoreError::IncompleteMix(_)) => {
            Notice::error("Incomplete Mix", "Please select both videos before saving")
        }
        SaveError::Store(StoreError::EmptyTitle) => {
            Notice::error("Title Required", "Please enter a title for your mix")
        }
        SaveError::Store(_) => Notice::error("Error", "Failed to save mix. Please try again."),
    }
}
