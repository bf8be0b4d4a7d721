//! Reconciliation of the image timeline against the audio timeline.
//!
//! The image sequence lasts `source_frame_count / fps` seconds; the audio lasts whatever it
//! decodes to. [`SyncMode::Video`] keeps every image and trims audio to match.
//! [`SyncMode::Audio`] sizes the output to the audio, dropping trailing images when the audio
//! is shorter or synthesizing extension frames when it is longer.

use crate::config::{SyncMode, VideoExtendMode};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Frame budget for one run. Immutable once computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    pub fps: Fps,
    pub frame_duration_sec: f64,
    pub source_frame_count: u64,
    pub audio_duration_sec: Option<f64>,
    /// `frames_from_source + extension_frames`.
    pub total_output_frames: u64,
    pub frames_from_source: u64,
    pub extension_frames: u64,
    /// How extension frames are drawn. `Some` only when `extension_frames > 0`.
    pub extend_mode: Option<VideoExtendMode>,
    /// Length audio must be cut to before muxing, if any.
    pub audio_trim_sec: Option<f64>,
}

impl Timeline {
    pub fn source_video_duration_sec(&self) -> f64 {
        self.fps.frames_to_secs(self.source_frame_count)
    }

    pub fn output_duration_sec(&self) -> f64 {
        self.fps.frames_to_secs(self.total_output_frames)
    }

    /// Presentation time of output frame `idx`.
    pub fn timestamp_sec(&self, idx: FrameIndex) -> f64 {
        self.fps.frames_to_secs(idx.0)
    }
}

/// Decide how many frames to emit and where they come from.
pub fn reconcile(
    source_frame_count: u64,
    fps: Fps,
    audio_duration_sec: Option<f64>,
    sync_mode: SyncMode,
    extend_mode: VideoExtendMode,
) -> SlidecastResult<Timeline> {
    if source_frame_count == 0 {
        return Err(SlidecastError::empty_input(
            "at least one image is required",
        ));
    }
    if let Some(d) = audio_duration_sec
        && !(d.is_finite() && d > 0.0)
    {
        return Err(SlidecastError::invalid_input(format!(
            "audio duration must be positive, got {d}"
        )));
    }

    let frame_duration_sec = fps.frame_duration_secs();
    let source_video_duration_sec = fps.frames_to_secs(source_frame_count);
    let base = Timeline {
        fps,
        frame_duration_sec,
        source_frame_count,
        audio_duration_sec,
        total_output_frames: source_frame_count,
        frames_from_source: source_frame_count,
        extension_frames: 0,
        extend_mode: None,
        audio_trim_sec: None,
    };

    let audio_sec = match (sync_mode, audio_duration_sec) {
        (SyncMode::Audio, Some(d)) => d,
        (_, audio) => {
            // Video wins: audio is only ever shortened to the image sequence.
            return Ok(Timeline {
                audio_trim_sec: audio.map(|_| source_video_duration_sec),
                ..base
            });
        }
    };

    let total_output_frames = ((audio_sec * fps.as_f64()).round() as u64).max(1);
    // Rounding to whole frames makes the frame counts, not the raw durations, decide the
    // branch: equal counts mean neither trimming nor extension.
    let frames_from_source = source_frame_count.min(total_output_frames);
    let extension_frames = total_output_frames - frames_from_source;

    Ok(Timeline {
        total_output_frames,
        frames_from_source,
        extension_frames,
        extend_mode: (extension_frames > 0).then_some(extend_mode),
        ..base
    })
}

#[cfg(test)]
#[path = "../tests/unit/timeline.rs"]
mod tests;
