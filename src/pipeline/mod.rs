//! Run orchestration: progress, cancellation, and the frame loop.
pub mod encoder;
pub mod progress;
