use std::io::{Read as _, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::Context as _;

use crate::audio::pcm::AudioTrack;
use crate::encode::sink::{FrameSink, OutputBuffer, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::foundation::math::mul_div255_u16;
use crate::foundation::temp::TempFileGuard;
use crate::render::frame::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// x264 speed/size preset.
    pub x264_preset: String,
}

impl Default for FfmpegSinkOpts {
    fn default() -> Self {
        Self {
            bg_rgba: [0, 0, 0, 255],
            x264_preset: "medium".to_string(),
        }
    }
}

/// MP4 sink backed by the system `ffmpeg` binary.
///
/// Frames are streamed as raw RGBA8 on stdin into an H.264 elementary encode. If an audio track
/// is pushed, `finish` runs a second `ffmpeg` pass that copies the video stream and muxes AAC
/// next to it. Intermediate files live in the temp dir and are removed on drop.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    video_out: Option<TempFileGuard>,
    audio_pcm: Option<TempFileGuard>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    last_ts: f64,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            video_out: None,
            audio_pcm: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
            last_ts: f64::NEG_INFINITY,
        }
    }

    fn finish_video_pass(&mut self) -> SlidecastResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| SlidecastError::finalization("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            SlidecastError::finalization(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SlidecastError::finalization("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| {
                    SlidecastError::finalization(format!("ffmpeg stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(SlidecastError::finalization(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Copy the encoded video stream and mux the raw PCM next to it as AAC.
fn mux_audio(
    video: &TempFileGuard,
    pcm: &TempFileGuard,
    cfg: &SinkConfig,
) -> SlidecastResult<TempFileGuard> {
    let audio = cfg
        .audio
        .as_ref()
        .ok_or_else(|| SlidecastError::finalization("audio pushed but not configured"))?;
    let muxed = TempFileGuard::new("muxed", "mp4");

    let out = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(video.path())
        .args([
            "-f",
            "f32le",
            "-ar",
            &audio.sample_rate.to_string(),
            "-ac",
            &audio.channels.to_string(),
            "-i",
        ])
        .arg(pcm.path())
        .args([
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-b:a",
            &audio.bitrate_bps.to_string(),
            "-movflags",
            "+faststart",
        ])
        .arg(muxed.path())
        .output()
        .map_err(|e| SlidecastError::finalization(format!("failed to run ffmpeg mux: {e}")))?;

    if !out.status.success() {
        return Err(SlidecastError::finalization(format!(
            "ffmpeg mux exited with status {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(muxed)
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(SlidecastError::encoder_init(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(SlidecastError::encoder_init(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if let Some(audio) = cfg.audio.as_ref()
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(SlidecastError::encoder_init(
                "audio sample_rate and channels must be non-zero when audio is enabled",
            ));
        }
        if !encoder_available() {
            return Err(SlidecastError::encoder_init(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let frame_len = (cfg.width as usize) * (cfg.height as usize) * 4;
        let mut scratch = Vec::new();
        scratch.try_reserve_exact(frame_len).map_err(|e| {
            SlidecastError::resource_exhausted(format!(
                "cannot allocate {}x{} encoder buffer: {e}",
                cfg.width, cfg.height
            ))
        })?;
        scratch.resize(frame_len, 0);

        let video_out = TempFileGuard::new("video", "mp4");
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Input: raw straight-alpha RGBA8, flattened to opaque in push_frame.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.get().to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-preset",
            &self.opts.x264_preset,
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            &cfg.video_bitrate_bps.to_string(),
            "-movflags",
            "+faststart",
        ])
        .arg(video_out.path());

        let mut child = cmd.spawn().map_err(|e| {
            SlidecastError::encoder_init(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SlidecastError::encoder_init("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SlidecastError::encoder_init("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps.get(),
            bitrate = cfg.video_bitrate_bps,
            "spawned ffmpeg video encoder"
        );

        self.scratch = scratch;
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.video_out = Some(video_out);
        self.audio_pcm = None;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.last_ts = f64::NEG_INFINITY;
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        timestamp_sec: f64,
        frame: &FrameRGBA,
    ) -> SlidecastResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SlidecastError::encoder_init("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(SlidecastError::invalid_input(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        if timestamp_sec < self.last_ts {
            return Err(SlidecastError::invalid_input(
                "ffmpeg sink received a decreasing timestamp",
            ));
        }
        self.last_idx = Some(idx);
        self.last_ts = timestamp_sec;

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(SlidecastError::invalid_input(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(SlidecastError::invalid_input(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlidecastError::finalization("ffmpeg sink is already finalized"));
        };
        stdin
            .write_all(&self.scratch)
            .context("failed to write frame to ffmpeg stdin")?;
        Ok(())
    }

    fn push_audio(&mut self, audio: &AudioTrack) -> SlidecastResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SlidecastError::encoder_init("ffmpeg sink not started"))?;
        match cfg.audio {
            Some(expected)
                if expected.sample_rate == audio.sample_rate
                    && expected.channels == audio.channels => {}
            _ => {
                return Err(SlidecastError::invalid_input(
                    "audio track layout does not match the sink configuration",
                ));
            }
        }

        let pcm = TempFileGuard::new("audio", "f32le");
        audio.write_f32le(pcm.path())?;
        self.audio_pcm = Some(pcm);
        Ok(())
    }

    fn finish(&mut self) -> SlidecastResult<OutputBuffer> {
        self.finish_video_pass()?;
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| SlidecastError::finalization("ffmpeg sink not started"))?;
        let video = self
            .video_out
            .take()
            .ok_or_else(|| SlidecastError::finalization("ffmpeg produced no video output"))?;

        let final_file = match self.audio_pcm.take() {
            Some(pcm) => mux_audio(&video, &pcm, &cfg)?,
            None => video,
        };

        let bytes = std::fs::read(final_file.path()).map_err(|e| {
            SlidecastError::finalization(format!("failed to read encoded output: {e}"))
        })?;
        if bytes.is_empty() {
            return Err(SlidecastError::finalization("encoding produced no output"));
        }
        Ok(bytes)
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Flatten straight-alpha RGBA8 over `bg_rgba` into opaque RGBA8 for the encoder.
fn flatten_to_opaque_rgba8(dst: &mut [u8], src: &[u8], bg_rgba: [u8; 4]) -> SlidecastResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SlidecastError::invalid_input(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let r = mul_div255_u16(s[0] as u16, a) + mul_div255_u16(bg_r, inv);
        let g = mul_div255_u16(s[1] as u16, a) + mul_div255_u16(bg_g, inv);
        let b = mul_div255_u16(s[2] as u16, a) + mul_div255_u16(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn encoder_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
