use std::sync::Mutex;

use crate::assets::source::{AudioBlob, SourceImage, image_error};
use crate::audio::pcm::AudioInput;
use crate::config::{EncodeConfig, VideoExtendMode};
use crate::encode::bitrate::{AUDIO_BITRATE_BPS, video_bitrate_bps};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioTrackConfig, FrameSink, OutputBuffer, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::geometry::resolve_dimensions;
use crate::pipeline::progress::{CancelToken, EncodingProgress, ProgressStatus};
use crate::render::composite::{draw_black, draw_image};
use crate::render::frame::FrameRGBA;
use crate::timeline::{Timeline, reconcile};

/// Frames between cooperative yields of the worker thread.
pub const YIELD_BATCH: u64 = 10;

#[derive(Debug, Default)]
struct EncoderState {
    /// Incremented on every run start and reset; stale runs never touch `progress`.
    generation: u64,
    /// Internal token of the active run. Never the caller's token.
    active: Option<CancelToken>,
    progress: EncodingProgress,
}

/// Drives images through compositing into a [`FrameSink`], one run at a time.
///
/// State machine: `idle -> encoding -> complete | error | idle (cancelled)`. Starting a run
/// while another is active cancels the earlier one first.
#[derive(Debug, Default)]
pub struct SlideshowEncoder {
    state: Mutex<EncoderState>,
    sink_opts: FfmpegSinkOpts,
}

impl SlideshowEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink_opts(sink_opts: FfmpegSinkOpts) -> Self {
        Self {
            state: Mutex::default(),
            sink_opts,
        }
    }

    /// Latest progress snapshot.
    pub fn progress(&self) -> EncodingProgress {
        self.lock().progress.clone()
    }

    /// Cancel the active run, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.lock().active.as_ref() {
            token.cancel();
        }
    }

    /// Cancel any active run and return to idle, e.g. after the caller changed its config.
    pub fn reset(&self) {
        let mut state = self.lock();
        if let Some(token) = state.active.take() {
            token.cancel();
        }
        state.generation += 1;
        state.progress = EncodingProgress::default();
    }

    /// Encode `images` (and optional `audio`) into an MP4 with the system `ffmpeg`.
    pub fn encode(
        &self,
        images: &[SourceImage],
        config: &EncodeConfig,
        audio: Option<&AudioBlob>,
        on_progress: impl FnMut(u64, u64),
        cancel: &CancelToken,
    ) -> SlidecastResult<OutputBuffer> {
        let mut sink = FfmpegSink::new(self.sink_opts.clone());
        self.encode_with_sink(
            &mut sink,
            images,
            config,
            audio.cloned().map(AudioInput::Encoded),
            on_progress,
            cancel,
        )
    }

    /// Encode into a caller-provided sink.
    pub fn encode_with_sink<S: FrameSink + ?Sized>(
        &self,
        sink: &mut S,
        images: &[SourceImage],
        config: &EncodeConfig,
        audio: Option<AudioInput>,
        mut on_progress: impl FnMut(u64, u64),
        cancel: &CancelToken,
    ) -> SlidecastResult<OutputBuffer> {
        let (generation, run_token) = self.start_run();
        let cancel = RunCancel {
            caller: cancel,
            run: run_token,
        };

        let result = run_pipeline(sink, images, config, audio, &cancel, |current, total| {
            self.update(generation, |p| *p = EncodingProgress::encoding(current, total));
            on_progress(current, total);
        });
        // A sink torn down by the interrupt (e.g. ffmpeg receiving SIGINT) still counts as a
        // cancellation.
        let result = match result {
            Err(e) if !e.is_cancelled() && cancel.check().is_err() => {
                tracing::debug!(error = %e, "failure after cancellation request");
                Err(SlidecastError::Cancelled)
            }
            other => other,
        };

        let mut state = self.lock();
        if state.generation == generation {
            state.active = None;
            match &result {
                Ok(_) => {
                    state.progress.status = ProgressStatus::Complete;
                    state.progress.current = state.progress.total;
                }
                Err(SlidecastError::Cancelled) => state.progress = EncodingProgress::default(),
                Err(e) => {
                    state.progress.status = ProgressStatus::Error;
                    state.progress.error = Some(e.to_string());
                }
            }
        }
        drop(state);

        match &result {
            Ok(bytes) => tracing::info!(bytes = bytes.len(), "encode complete"),
            Err(SlidecastError::Cancelled) => tracing::info!("encode cancelled"),
            Err(e) => tracing::error!(error = %e, "encode failed"),
        }
        result
    }

    fn start_run(&self) -> (u64, CancelToken) {
        let mut state = self.lock();
        if let Some(prev) = state.active.take() {
            tracing::warn!("cancelling the previous run before starting a new one");
            prev.cancel();
        }
        let run_token = CancelToken::new();
        state.generation += 1;
        state.active = Some(run_token.clone());
        state.progress = EncodingProgress::encoding(0, 0);
        (state.generation, run_token)
    }

    fn update(&self, generation: u64, f: impl FnOnce(&mut EncodingProgress)) {
        let mut state = self.lock();
        if state.generation == generation {
            f(&mut state.progress);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EncoderState> {
        // Progress is plain data; a panic elsewhere cannot leave it half-written.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One-shot convenience wrapper around [`SlideshowEncoder::encode`].
pub fn encode_slideshow(
    images: &[SourceImage],
    config: &EncodeConfig,
    audio: Option<&AudioBlob>,
    on_progress: impl FnMut(u64, u64),
    cancel: &CancelToken,
) -> SlidecastResult<OutputBuffer> {
    SlideshowEncoder::new().encode(images, config, audio, on_progress, cancel)
}

/// Cancellation sources of one run: the caller's token and the encoder-owned run token.
struct RunCancel<'a> {
    caller: &'a CancelToken,
    run: CancelToken,
}

impl RunCancel<'_> {
    fn check(&self) -> SlidecastResult<()> {
        self.caller.check()?;
        self.run.check()
    }
}

#[tracing::instrument(skip_all, fields(images = images.len()))]
fn run_pipeline<S: FrameSink + ?Sized>(
    sink: &mut S,
    images: &[SourceImage],
    config: &EncodeConfig,
    audio: Option<AudioInput>,
    cancel: &RunCancel<'_>,
    mut report: impl FnMut(u64, u64),
) -> SlidecastResult<OutputBuffer> {
    let first = images
        .first()
        .ok_or_else(|| SlidecastError::empty_input("at least one image is required"))?;
    cancel.check()?;

    let image_count = images.len() as u64;
    let natural = first
        .natural_size()
        .map_err(|e| image_error(e, &first.name, 0, image_count))?;
    let geometry = resolve_dimensions(natural, config.resolution, config.aspect_mode)?;

    let mut audio = audio.map(AudioInput::into_track).transpose()?;
    cancel.check()?;

    let video_bitrate_bps = video_bitrate_bps(config.quality, config.bitrate_policy, geometry);
    let timeline = reconcile(
        image_count,
        config.fps,
        audio.as_ref().map(|a| a.duration_sec()),
        config.sync_mode,
        config.video_extend_mode,
    )?;
    let total = timeline.total_output_frames;

    tracing::info!(
        width = geometry.width,
        height = geometry.height,
        fps = config.fps.get(),
        video_bitrate_bps,
        source_frames = timeline.frames_from_source,
        extension_frames = timeline.extension_frames,
        total,
        "starting encode"
    );

    let mut frame = FrameRGBA::try_new(geometry.width, geometry.height)?;

    sink.begin(SinkConfig {
        width: geometry.width,
        height: geometry.height,
        fps: config.fps,
        video_bitrate_bps,
        audio: audio.as_ref().map(|a| AudioTrackConfig {
            sample_rate: a.sample_rate,
            channels: a.channels,
            bitrate_bps: AUDIO_BITRATE_BPS,
        }),
    })
    .map_err(as_init_error)?;

    let mut cursor = FrameCursor::new(&timeline);

    for (i, image) in images
        .iter()
        .take(timeline.frames_from_source as usize)
        .enumerate()
    {
        cancel.check()?;
        let bitmap = image
            .decode_rgba8()
            .map_err(|e| image_error(e, &image.name, i, image_count))?;
        draw_image(&mut frame, &bitmap, config.aspect_mode)?;
        drop(bitmap);

        cursor.submit(sink, &frame)?;
        report(cursor.emitted(), total);
    }

    if let Some(mode) = timeline.extend_mode {
        // `Last` reuses the canvas as-is: it still holds the final source composite.
        if mode == VideoExtendMode::Black {
            draw_black(&mut frame);
        }
        for _ in 0..timeline.extension_frames {
            cancel.check()?;
            cursor.submit(sink, &frame)?;
            report(cursor.emitted(), total);
        }
    }

    if let Some(track) = audio.as_mut() {
        if let Some(secs) = timeline.audio_trim_sec
            && track.trim_to(secs)
        {
            tracing::debug!(secs, "trimmed audio to image sequence");
        }
        sink.push_audio(track).map_err(as_finalization_error)?;
    }

    sink.finish().map_err(as_finalization_error)
}

/// Output frame index and timestamp shared by the main and extension loops.
struct FrameCursor<'a> {
    timeline: &'a Timeline,
    next: FrameIndex,
}

impl<'a> FrameCursor<'a> {
    fn new(timeline: &'a Timeline) -> Self {
        Self {
            timeline,
            next: FrameIndex(0),
        }
    }

    fn emitted(&self) -> u64 {
        self.next.0
    }

    fn submit<S: FrameSink + ?Sized>(
        &mut self,
        sink: &mut S,
        frame: &FrameRGBA,
    ) -> SlidecastResult<()> {
        let idx = self.next;
        let total = self.timeline.total_output_frames;
        sink.push_frame(idx, self.timeline.timestamp_sec(idx), frame)
            .map_err(|e| as_submission_error(e, idx.0 + 1, total))?;
        self.next = FrameIndex(idx.0 + 1);

        if self.next.0.is_multiple_of(YIELD_BATCH) {
            tracing::debug!(frame = self.next.0, total, "batch checkpoint");
            std::thread::yield_now();
        }
        Ok(())
    }
}

fn as_init_error(err: SlidecastError) -> SlidecastError {
    match err {
        e @ (SlidecastError::EncoderInit(_)
        | SlidecastError::ResourceExhausted(_)
        | SlidecastError::Cancelled) => e,
        other => SlidecastError::encoder_init(other.to_string()),
    }
}

fn as_submission_error(err: SlidecastError, index: u64, total: u64) -> SlidecastError {
    match err {
        e @ (SlidecastError::FrameSubmission { .. }
        | SlidecastError::ResourceExhausted(_)
        | SlidecastError::Cancelled) => e,
        other => SlidecastError::frame_submission(index, total, other.to_string()),
    }
}

fn as_finalization_error(err: SlidecastError) -> SlidecastError {
    match err {
        e @ (SlidecastError::Finalization(_)
        | SlidecastError::ResourceExhausted(_)
        | SlidecastError::Cancelled) => e,
        other => SlidecastError::finalization(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/encoder.rs"]
mod tests;
