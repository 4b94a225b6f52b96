//! Fader positions and presentation templates

use crate::types::clamp_unit;

/// Video and audio crossfader positions
///
/// Both values live in [0, 1]: 0.0 is fully slot A, 1.0 fully slot B.
/// The pair is `Copy` and always replaced as a whole, so a render pass can
/// never observe a half-updated pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaderPair {
    video: f32,
    audio: f32,
}

impl FaderPair {
    /// Create a pair, clamping both values to [0, 1]
    pub fn new(video: f32, audio: f32) -> Self {
        Self {
            video: clamp_unit(video),
            audio: clamp_unit(audio),
        }
    }

    /// Both faders at the same position
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Visual blend position
    #[inline]
    pub fn video(&self) -> f32 {
        self.video
    }

    /// Audio gain balance position
    #[inline]
    pub fn audio(&self) -> f32 {
        self.audio
    }

    /// Copy with a new video position
    pub fn with_video(self, video: f32) -> Self {
        Self::new(video, self.audio)
    }

    /// Copy with a new audio position
    pub fn with_audio(self, audio: f32) -> Self {
        Self::new(self.video, audio)
    }

    /// Rebuild a pair from stored integer percentages
    ///
    /// Records saved before the audio fader existed carry no audio value;
    /// those fall back to the video position.
    pub fn from_percent(video: u8, audio: Option<u8>) -> Self {
        let video = percent_to_fader(video);
        let audio = audio.map(percent_to_fader).unwrap_or(video);
        Self::new(video, audio)
    }

    /// Integer percentages (video, audio) for storage
    pub fn to_percent(&self) -> (u8, u8) {
        (fader_to_percent(self.video), fader_to_percent(self.audio))
    }
}

impl Default for FaderPair {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

/// Convert a fader position to a whole percentage (0-100)
pub fn fader_to_percent(value: f32) -> u8 {
    (clamp_unit(value) * 100.0).round() as u8
}

/// Convert a stored percentage back to a fader position
pub fn percent_to_fader(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

/// Visual blending mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Template {
    /// Both slots full-frame and stacked with complementary opacity
    Overlay,
    /// Side by side, width shares clamped to a visible minimum
    #[default]
    Split,
}

impl Template {
    /// All templates in display order
    pub const ALL: [Template; 2] = [Template::Split, Template::Overlay];

    /// Fader position applied when the template is selected
    pub fn default_fader(self) -> f32 {
        match self {
            // Full fade to B
            Template::Overlay => 1.0,
            // Even 50/50 split
            Template::Split => 0.5,
        }
    }

    /// Stable identifier used in saved mixes
    pub fn id(self) -> &'static str {
        match self {
            Template::Overlay => "fade-through",
            Template::Split => "split",
        }
    }

    /// Parse a stored identifier
    ///
    /// Unknown identifiers fall back to `Split`, the template every new
    /// session starts in.
    pub fn from_id(id: &str) -> Self {
        match id {
            "fade-through" | "fade" | "overlay" => Template::Overlay,
            "split" | "side-by-side" => Template::Split,
            other => {
                log::warn!("Template: unknown template id {:?}, using split", other);
                Template::Split
            }
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Template::Overlay => "Fade",
            Template::Split => "Split",
        }
    }
}
