//! Slidecast turns an ordered set of still images, plus an optional audio track, into an
//! H.264/AAC MP4 slideshow.
//!
//! The flow of one run:
//!
//! - Resolve the output size from the first image, the target resolution and the aspect mode
//! - Map quality to a video bitrate
//! - Reconcile the image timeline against the audio timeline
//! - Composite each image onto a reused canvas and stream it into a [`FrameSink`]
//!
//! [`SlideshowEncoder`] drives runs and exposes progress and cancellation.
#![forbid(unsafe_code)]

mod foundation;

/// Image and audio inputs.
pub mod assets;
/// Audio decoding and trimming.
pub mod audio;
/// Run configuration.
pub mod config;
/// Encoding sinks and bitrate selection.
pub mod encode;
/// Output dimension resolution.
pub mod geometry;
pub mod pipeline;
/// Frame buffers and image compositing.
pub mod render;
/// Image/audio timeline reconciliation.
pub mod timeline;

pub use crate::foundation::core::{Fps, FrameIndex, TargetGeometry};
pub use crate::foundation::error::{SlidecastError, SlidecastResult};

pub use crate::assets::source::{AudioBlob, SourceImage};
pub use crate::audio::pcm::{AudioInput, AudioTrack};
pub use crate::config::{
    AspectMode, BitratePolicy, EncodeConfig, Preset, Resolution, SyncMode, VideoExtendMode,
};
pub use crate::encode::bitrate::{QualityBand, video_bitrate_bps};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, encoder_available};
pub use crate::encode::sink::{AudioTrackConfig, FrameSink, InMemorySink, OutputBuffer, SinkConfig};
pub use crate::geometry::resolve_dimensions;
pub use crate::pipeline::encoder::{SlideshowEncoder, encode_slideshow};
pub use crate::pipeline::progress::{CancelToken, EncodingProgress, ProgressStatus};
pub use crate::render::frame::FrameRGBA;
pub use crate::timeline::{Timeline, reconcile};
