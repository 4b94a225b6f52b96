//! Crossfade mapping - fader positions to gains, opacities and widths
//!
//! Everything here is a pure function of the session's fader pair, its
//! template and which slots are populated. Inputs are clamped, so the
//! mapping has no error channel.
//!
//! - Audio is a linear crossfade in both templates:
//!   `volume_a = 1 - audio`, `volume_b = audio`. (Linear, not
//!   equal-power: the sum dips to 1.0 total rather than staying at
//!   constant perceived loudness through the middle.)
//! - `Overlay` stacks both streams full-frame with complementary opacity.
//! - `Split` puts them side by side, each width share clamped to
//!   [20%, 80%] so neither stream ever disappears.

mod apply;
mod labels;

pub use apply::apply_output;
pub use labels::{fader_labels, mix_labels, FaderLabels, MixLabels};

use crate::session::{FaderPair, Template};
use crate::types::{clamp_unit, SlotLabel, NUM_SLOTS};

/// Smallest width share (percent) a side gets in split mode
pub const SPLIT_MIN_SHARE: f32 = 20.0;
/// Largest width share (percent) a side gets in split mode
pub const SPLIT_MAX_SHARE: f32 = 80.0;

/// How the two streams are laid out in the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// No stream assigned: show the empty-mix placeholder
    Placeholder,
    /// Exactly one stream assigned: it fills the frame
    Single { slot: SlotLabel },
    /// Both streams fill the frame, stacked; weights are opacities
    Stacked,
    /// Both streams side by side; widths in percent of the frame
    SideBySide { width_a: f32, width_b: f32 },
}

/// Result of mapping a fader pair through a template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixOutput {
    /// Gain for slot A (0.0 to 1.0)
    pub volume_a: f32,
    /// Gain for slot B (0.0 to 1.0)
    pub volume_b: f32,
    /// Visual weight of slot A: opacity when stacked, width fraction when split
    pub weight_a: f32,
    /// Visual weight of slot B
    pub weight_b: f32,
    pub geometry: Geometry,
}

impl MixOutput {
    /// Gain for a slot
    pub fn volume(&self, label: SlotLabel) -> f32 {
        match label {
            SlotLabel::A => self.volume_a,
            SlotLabel::B => self.volume_b,
        }
    }

    /// Visual weight for a slot
    pub fn weight(&self, label: SlotLabel) -> f32 {
        match label {
            SlotLabel::A => self.weight_a,
            SlotLabel::B => self.weight_b,
        }
    }

    /// Same layout with both gains at zero (preview sessions)
    pub fn silenced(self) -> Self {
        Self {
            volume_a: 0.0,
            volume_b: 0.0,
            ..self
        }
    }
}

/// Map a fader pair assuming both slots are populated
pub fn compute_mix(fader: FaderPair, template: Template) -> MixOutput {
    compute_mix_for(fader, template, [true; NUM_SLOTS])
}

/// Map a fader pair for the given slot population
///
/// An empty slot gets zero gain and zero weight whatever the faders say.
/// With one populated slot the layout falls back to that stream alone,
/// full-frame and fully opaque; its gain still follows the audio fader.
pub fn compute_mix_for(
    fader: FaderPair,
    template: Template,
    populated: [bool; NUM_SLOTS],
) -> MixOutput {
    let video = clamp_unit(fader.video());
    let audio = clamp_unit(fader.audio());

    let volume_a = (1.0 - audio).max(0.0);
    let volume_b = audio.max(0.0);

    let (weight_a, weight_b, geometry) = match populated {
        [true, true] => match template {
            Template::Overlay => (1.0 - video, video, Geometry::Stacked),
            Template::Split => {
                let width_a = split_share(1.0 - video);
                let width_b = split_share(video);
                (
                    width_a / 100.0,
                    width_b / 100.0,
                    Geometry::SideBySide { width_a, width_b },
                )
            }
        },
        [true, false] => (1.0, 0.0, Geometry::Single { slot: SlotLabel::A }),
        [false, true] => (0.0, 1.0, Geometry::Single { slot: SlotLabel::B }),
        [false, false] => (0.0, 0.0, Geometry::Placeholder),
    };

    MixOutput {
        volume_a: if populated[0] { volume_a } else { 0.0 },
        volume_b: if populated[1] { volume_b } else { 0.0 },
        weight_a,
        weight_b,
        geometry,
    }
}

/// Width share in percent for a side whose unclamped share is `fraction`
fn split_share(fraction: f32) -> f32 {
    (fraction * 100.0).clamp(SPLIT_MIN_SHARE, SPLIT_MAX_SHARE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> impl Iterator<Item = f32> {
        (0..=100).map(|i| i as f32 / 100.0)
    }

    #[test]
    fn test_overlay_weights_sum_to_one() {
        for f in steps() {
            let out = compute_mix(FaderPair::uniform(f), Template::Overlay);
            assert!((out.weight_a + out.weight_b - 1.0).abs() < 1e-6, "f = {}", f);
            assert_eq!(out.geometry, Geometry::Stacked);
        }
    }

    #[test]
    fn test_split_shares_stay_visible() {
        for f in steps() {
            let out = compute_mix(FaderPair::uniform(f), Template::Split);
            let Geometry::SideBySide { width_a, width_b } = out.geometry else {
                panic!("expected side-by-side geometry");
            };
            for width in [width_a, width_b] {
                assert!((SPLIT_MIN_SHARE..=SPLIT_MAX_SHARE).contains(&width), "f = {}", f);
            }
            assert!(out.weight_a >= 0.2 && out.weight_a <= 0.8);
            assert!(out.weight_b >= 0.2 && out.weight_b <= 0.8);
        }
    }

    #[test]
    fn test_split_extremes_clamp() {
        let out = compute_mix(FaderPair::uniform(0.0), Template::Split);
        assert_eq!(
            out.geometry,
            Geometry::SideBySide { width_a: 80.0, width_b: 20.0 }
        );
        let out = compute_mix(FaderPair::uniform(1.0), Template::Split);
        assert_eq!(
            out.geometry,
            Geometry::SideBySide { width_a: 20.0, width_b: 80.0 }
        );
    }

    #[test]
    fn test_split_even_at_center() {
        let out = compute_mix(FaderPair::uniform(0.5), Template::Split);
        assert_eq!(
            out.geometry,
            Geometry::SideBySide { width_a: 50.0, width_b: 50.0 }
        );
    }

    #[test]
    fn test_audio_is_linear_and_template_independent() {
        for template in Template::ALL {
            let out = compute_mix(FaderPair::new(0.5, 0.25), template);
            assert_eq!(out.volume_a, 0.75);
            assert_eq!(out.volume_b, 0.25);
        }
        // Linear crossfade: both sides at half gain in the middle
        let out = compute_mix(FaderPair::new(0.0, 0.5), Template::Overlay);
        assert_eq!(out.volume_a, 0.5);
        assert_eq!(out.volume_b, 0.5);
    }

    #[test]
    fn test_video_and_audio_faders_independent() {
        let out = compute_mix(FaderPair::new(1.0, 0.0), Template::Overlay);
        assert_eq!(out.weight_a, 0.0);
        assert_eq!(out.weight_b, 1.0);
        assert_eq!(out.volume_a, 1.0);
        assert_eq!(out.volume_b, 0.0);
    }

    #[test]
    fn test_missing_slot_forced_silent_and_invisible() {
        let out = compute_mix_for(FaderPair::uniform(0.0), Template::Overlay, [false, true]);
        assert_eq!(out.volume_a, 0.0);
        assert_eq!(out.weight_a, 0.0);
        assert_eq!(out.weight_b, 1.0);
        assert_eq!(out.volume_b, 0.0); // audio fader fully on A
        assert_eq!(out.geometry, Geometry::Single { slot: SlotLabel::B });

        let out = compute_mix_for(FaderPair::uniform(0.3), Template::Split, [true, false]);
        assert_eq!(out.volume_b, 0.0);
        assert_eq!(out.weight_b, 0.0);
        assert!((out.volume_a - 0.7).abs() < 1e-6);
        assert_eq!(out.geometry, Geometry::Single { slot: SlotLabel::A });
    }

    #[test]
    fn test_empty_mix_placeholder() {
        let out = compute_mix_for(FaderPair::default(), Template::Split, [false, false]);
        assert_eq!(out.geometry, Geometry::Placeholder);
        assert_eq!(out.volume(SlotLabel::A), 0.0);
        assert_eq!(out.volume(SlotLabel::B), 0.0);
    }

    #[test]
    fn test_silenced_keeps_layout() {
        let out = compute_mix(FaderPair::uniform(0.5), Template::Overlay).silenced();
        assert_eq!(out.volume_a, 0.0);
        assert_eq!(out.volume_b, 0.0);
        assert_eq!(out.weight_a, 0.5);
    }
}
