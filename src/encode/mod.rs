//! Encoding sinks and bitrate policy.
//!
//! Sinks consume composited frames in output order and produce the final container bytes.

/// Quality scalar to bitrate mapping.
pub mod bitrate;
/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
