use crate::audio::pcm::AudioTrack;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::render::frame::FrameRGBA;

/// Finalized container bytes of one successful run.
pub type OutputBuffer = Vec<u8>;

/// Configuration provided to a [`FrameSink`] before any frame is pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub video_bitrate_bps: u32,
    /// Present when an audio track will be pushed before [`FrameSink::finish`].
    pub audio: Option<AudioTrackConfig>,
}

/// Layout and bitrate of the audio track a sink should expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTrackConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub bitrate_bps: u32,
}

/// Consumer of composited frames, i.e. the encoder plus container muxer.
///
/// Ordering contract: `push_frame` is called with strictly increasing [`FrameIndex`] and
/// non-decreasing timestamps; `push_audio` at most once, after the last frame; `finish` once.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()>;
    /// Submit one frame displayed from `timestamp_sec` for one frame duration.
    fn push_frame(
        &mut self,
        idx: FrameIndex,
        timestamp_sec: f64,
        frame: &FrameRGBA,
    ) -> SlidecastResult<()>;
    /// Submit the (already trimmed) audio track.
    fn push_audio(&mut self, audio: &AudioTrack) -> SlidecastResult<()>;
    /// Finalize the container and hand back its bytes.
    fn finish(&mut self) -> SlidecastResult<OutputBuffer>;
}

/// In-memory sink for tests and debugging.
///
/// `finish` returns the pushed frames concatenated as raw RGBA8.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, f64, FrameRGBA)>,
    audio: Option<AudioTrack>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames in submission order with their timestamps.
    pub fn frames(&self) -> &[(FrameIndex, f64, FrameRGBA)] {
        &self.frames
    }

    pub fn audio(&self) -> Option<&AudioTrack> {
        self.audio.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.audio = None;
        self.finished = false;
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        timestamp_sec: f64,
        frame: &FrameRGBA,
    ) -> SlidecastResult<()> {
        if self.cfg.is_none() {
            return Err(SlidecastError::encoder_init("in-memory sink not started"));
        }
        self.frames.push((idx, timestamp_sec, frame.clone()));
        Ok(())
    }

    fn push_audio(&mut self, audio: &AudioTrack) -> SlidecastResult<()> {
        self.audio = Some(audio.clone());
        Ok(())
    }

    fn finish(&mut self) -> SlidecastResult<OutputBuffer> {
        if self.finished {
            return Err(SlidecastError::finalization("in-memory sink already finished"));
        }
        self.finished = true;
        Ok(self
            .frames
            .iter()
            .flat_map(|(_, _, f)| f.data.iter().copied())
            .collect())
    }
}
