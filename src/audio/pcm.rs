use std::path::Path;
use std::process::Command;

use anyhow::Context as _;

use crate::assets::source::AudioBlob;
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::foundation::temp::TempFileGuard;

/// Sample rate audio is decoded to before muxing.
pub const DECODE_SAMPLE_RATE: u32 = 48_000;
/// Channel layout audio is decoded to before muxing.
pub const DECODE_CHANNELS: u16 = 2;

/// Decoded interleaved `f32` PCM, owned by a single encode run.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioTrack {
    pub fn new(sample_rate: u32, channels: u16, interleaved_f32: Vec<f32>) -> SlidecastResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(SlidecastError::invalid_input(
                "audio sample_rate and channels must be non-zero",
            ));
        }
        if !interleaved_f32.len().is_multiple_of(usize::from(channels)) {
            return Err(SlidecastError::invalid_input(
                "audio sample count is not a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            interleaved_f32,
        })
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.interleaved_f32.len() / usize::from(self.channels)
    }

    pub fn duration_sec(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Cut the track to at most `secs` seconds. Never extends.
    ///
    /// Returns `true` if samples were dropped.
    pub fn trim_to(&mut self, secs: f64) -> bool {
        let max_frames = (f64::from(self.sample_rate) * secs.max(0.0)).floor() as usize;
        if max_frames >= self.frames() {
            return false;
        }
        self.interleaved_f32
            .truncate(max_frames * usize::from(self.channels));
        true
    }

    /// Write samples as raw little-endian `f32` for ffmpeg's `f32le` demuxer.
    pub(crate) fn write_f32le(&self, out_path: &Path) -> SlidecastResult<()> {
        let mut bytes = Vec::<u8>::with_capacity(self.interleaved_f32.len() * 4);
        for &sample in &self.interleaved_f32 {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        std::fs::write(out_path, bytes)
            .with_context(|| format!("write pcm audio '{}'", out_path.display()))?;
        Ok(())
    }
}

/// Audio handed to the pipeline: either still encoded, or already decoded by the caller.
#[derive(Clone, Debug)]
pub enum AudioInput {
    Encoded(AudioBlob),
    Decoded(AudioTrack),
}

impl AudioInput {
    pub fn into_track(self) -> SlidecastResult<AudioTrack> {
        match self {
            AudioInput::Encoded(blob) => decode_audio(&blob),
            AudioInput::Decoded(track) => {
                if track.frames() == 0 {
                    return Err(SlidecastError::decode(
                        "audio",
                        1,
                        1,
                        "audio track contains no samples",
                    ));
                }
                Ok(track)
            }
        }
    }
}

/// Decode a compressed audio blob to stereo `f32` PCM at [`DECODE_SAMPLE_RATE`] with `ffmpeg`.
pub fn decode_audio(blob: &AudioBlob) -> SlidecastResult<AudioTrack> {
    let input = TempFileGuard::new("audio_in", "bin");
    std::fs::write(input.path(), blob.bytes())
        .with_context(|| format!("stage audio '{}' for decoding", blob.name))?;

    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(input.path())
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &DECODE_CHANNELS.to_string(),
            "-ar",
            &DECODE_SAMPLE_RATE.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| audio_error(blob, format!("failed to run ffmpeg: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        return Err(audio_error(blob, msg.trim()));
    }

    let pcm = pcm_from_f32le(&out.stdout).map_err(|msg| audio_error(blob, msg))?;
    if pcm.is_empty() {
        return Err(audio_error(blob, "audio track contains no samples"));
    }

    let track = AudioTrack::new(DECODE_SAMPLE_RATE, DECODE_CHANNELS, pcm)?;
    tracing::debug!(
        name = %blob.name,
        duration_sec = track.duration_sec(),
        "decoded audio"
    );
    Ok(track)
}

fn pcm_from_f32le(bytes: &[u8]) -> Result<Vec<f32>, &'static str> {
    if !bytes.len().is_multiple_of(4) {
        return Err("decoded audio byte length is not aligned to f32 samples");
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn audio_error(blob: &AudioBlob, msg: impl std::fmt::Display) -> SlidecastError {
    SlidecastError::decode("audio", 1, 1, format!("{}: {msg}", blob.name))
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pcm.rs"]
mod tests;
