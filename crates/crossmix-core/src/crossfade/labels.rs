//! Percentage labels shown next to the faders
//!
//! Each side is rounded on its own, so a pair can read 88% / 13%. That is
//! what users have always seen and is kept as-is.

/// Left/right percentages for one fader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaderLabels {
    pub left: u8,
    pub right: u8,
}

impl std::fmt::Display for FaderLabels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L: {}% | R: {}%", self.left, self.right)
    }
}

/// Labels for both faders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixLabels {
    pub video: FaderLabels,
    pub audio: FaderLabels,
}

/// Compute the labels for one fader position
pub fn fader_labels(value: f32) -> FaderLabels {
    let value = f64::from(crate::types::clamp_unit(value));
    FaderLabels {
        left: ((1.0 - value) * 100.0).round() as u8,
        right: (value * 100.0).round() as u8,
    }
}

/// Compute the labels for a fader pair
pub fn mix_labels(fader: crate::session::FaderPair) -> MixLabels {
    MixLabels {
        video: fader_labels(fader.video()),
        audio: fader_labels(fader.audio()),
    }
}
