//! Run configuration consumed from the caller.
//!
//! [`EncodeConfig`] is immutable for the duration of one encode run. It (de)serializes with
//! lower-case enum names so it can be loaded from JSON:
//!
//! ```json
//! { "fps": 30, "quality": 50, "resolution": "1080p", "aspect_mode": "contain",
//!   "sync_mode": "audio", "video_extend_mode": "black" }
//! ```

use crate::foundation::core::Fps;
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// How a source image is fit onto the output canvas.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AspectMode {
    /// Pick a canvas whose aspect ratio matches the source, then letterbox-fit.
    Match,
    /// Scale to fit entirely inside the canvas, leaving empty margins.
    #[default]
    Contain,
    /// Scale to fill the canvas, clipping overflow.
    Cover,
    /// Fill the canvas exactly, ignoring aspect ratio.
    Stretch,
}

/// Which timeline wins when audio and images disagree on duration.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Output length follows the audio track.
    Audio,
    /// Output length follows the image sequence; audio is trimmed.
    #[default]
    Video,
}

/// How synthesized frames are drawn when audio outlasts the images.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VideoExtendMode {
    /// Hold the final source image.
    #[default]
    Last,
    /// Solid black.
    Black,
}

/// How quality is turned into a video bitrate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BitratePolicy {
    /// Five fixed bitrate tiers.
    #[default]
    Banded,
    /// Bitrate proportional to pixel count.
    Proportional,
}

/// Named output size presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    P360,
    P480,
    P720,
    P1080,
    P1440,
    K4,
    K8,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::P360,
        Preset::P480,
        Preset::P720,
        Preset::P1080,
        Preset::P1440,
        Preset::K4,
        Preset::K8,
    ];

    /// Declared `(width, height)` of the preset.
    pub fn size(self) -> (u32, u32) {
        match self {
            Preset::P360 => (640, 360),
            Preset::P480 => (854, 480),
            Preset::P720 => (1280, 720),
            Preset::P1080 => (1920, 1080),
            Preset::P1440 => (2560, 1440),
            Preset::K4 => (3840, 2160),
            Preset::K8 => (7680, 4320),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::P360 => "360p",
            Preset::P480 => "480p",
            Preset::P720 => "720p",
            Preset::P1080 => "1080p",
            Preset::P1440 => "1440p",
            Preset::K4 => "4k",
            Preset::K8 => "8k",
        }
    }
}

/// Requested output size: keep the first image's size, or use a preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Source,
    Preset(Preset),
}

impl std::str::FromStr for Resolution {
    type Err = SlidecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("source") {
            return Ok(Resolution::Source);
        }
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .map(Resolution::Preset)
            .ok_or_else(|| SlidecastError::invalid_input(format!("unknown resolution '{s}'")))
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Source => f.write_str("source"),
            Resolution::Preset(p) => f.write_str(p.name()),
        }
    }
}

impl serde::Serialize for Resolution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Resolution {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Immutable configuration for one encode run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    pub fps: Fps,
    /// 1..=100; values outside are clamped when mapping to bitrate.
    pub quality: u32,
    pub resolution: Resolution,
    pub aspect_mode: AspectMode,
    pub sync_mode: SyncMode,
    /// Only consulted when `sync_mode` is [`SyncMode::Audio`].
    pub video_extend_mode: VideoExtendMode,
    pub bitrate_policy: BitratePolicy,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            quality: 50,
            resolution: Resolution::Source,
            aspect_mode: AspectMode::Contain,
            sync_mode: SyncMode::Video,
            video_extend_mode: VideoExtendMode::Last,
            bitrate_policy: BitratePolicy::Banded,
        }
    }
}

impl EncodeConfig {
    /// Load a config from a JSON document.
    pub fn from_json_str(s: &str) -> SlidecastResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| SlidecastError::invalid_input(format!("config json: {e}")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
