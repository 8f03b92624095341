use crate::{
    foundation::error::{DriftError, DriftResult},
    transition::kind::parse_transition,
};

/// How a source image is framed inside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Crop the source to fill the viewport; no bars, some content lost.
    #[default]
    PanScan,
    /// Show the full image with black bars on any aspect mismatch.
    Letterbox,
}

/// Transition style and timing between consecutive slides.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TransitionSpec {
    /// Canonical style identifier (`none`, `crossfade`, `wipe`, `slide`,
    /// `fade_to_black`).
    pub kind: String,
    /// Blend window length in seconds; `0` means a hard cut.
    pub duration_secs: f64,
    /// Style-specific parameters (e.g. `{"dir": "ltr", "soft_edge": 0.1}`).
    #[serde(default)]
    pub params: serde_json::Value,
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            kind: "crossfade".to_string(),
            duration_secs: 1.0,
            params: serde_json::Value::Null,
        }
    }
}

/// Playback configuration for one slideshow session.
///
/// A profile is a pure data model supplied by the host, typically loaded
/// from a JSON settings store with one entry per named profile. It is
/// validated once and then immutable for the lifetime of a playback
/// session.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    /// Seconds each image stays on screen, `1..=60` inclusive.
    pub display_secs: f64,
    /// Whether the pan/zoom motion effect is applied.
    #[serde(default = "default_true")]
    pub ken_burns: bool,
    /// Motion strength, `1..=10`. 10 allows up to a 2x zoom-in.
    #[serde(default = "default_intensity")]
    pub ken_intensity: u8,
    /// Transition style between slides.
    #[serde(default)]
    pub transition: TransitionSpec,
    /// Framing mode for aspect-ratio mismatches.
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Surface the current file name on composited frames.
    #[serde(default)]
    pub show_filename: bool,
    /// Shuffle the playlist (deterministically, from `seed`).
    #[serde(default)]
    pub shuffle: bool,
    /// Determinism seed for shuffle order and motion planning.
    #[serde(default)]
    pub seed: u64,
}

fn default_true() -> bool {
    true
}

fn default_intensity() -> u8 {
    5
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            display_secs: 8.0,
            ken_burns: true,
            ken_intensity: 5,
            transition: TransitionSpec::default(),
            display_mode: DisplayMode::PanScan,
            show_filename: false,
            shuffle: false,
            seed: 0,
        }
    }
}

impl Profile {
    /// Validate ranges and the transition specification.
    ///
    /// The playback core trusts a validated profile afterwards; hosts should
    /// call this once before starting a session.
    pub fn validate(&self) -> DriftResult<()> {
        if !self.display_secs.is_finite() || !(1.0..=60.0).contains(&self.display_secs) {
            return Err(DriftError::validation(format!(
                "display_secs must be within [1, 60], got {}",
                self.display_secs
            )));
        }
        if !(1..=10).contains(&self.ken_intensity) {
            return Err(DriftError::validation(format!(
                "ken_intensity must be within [1, 10], got {}",
                self.ken_intensity
            )));
        }
        if !self.transition.duration_secs.is_finite() || self.transition.duration_secs < 0.0 {
            return Err(DriftError::validation(
                "transition duration_secs must be finite and >= 0",
            ));
        }
        parse_transition(&self.transition)?;
        Ok(())
    }

    /// Zoom headroom as a fraction: intensity 5 allows up to +50%.
    pub fn intensity_fraction(&self) -> f64 {
        f64::from(self.ken_intensity) / 10.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/profile/model.rs"]
mod tests;
