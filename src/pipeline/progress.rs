use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Lifecycle of an encoder as seen by an observer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    #[default]
    Idle,
    Encoding,
    Complete,
    Error,
}

/// Snapshot of encoder progress.
///
/// `current` never decreases within one run. Cancellation resets the snapshot to the default
/// (`0/0`, idle).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncodingProgress {
    pub current: u64,
    pub total: u64,
    pub status: ProgressStatus,
    /// Human-readable failure, set only when `status` is `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EncodingProgress {
    pub fn encoding(current: u64, total: u64) -> Self {
        Self {
            current,
            total,
            status: ProgressStatus::Encoding,
            error: None,
        }
    }

    /// Fraction complete in `[0, 1]`; `0` until the total is known.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Shared, clonable cancellation flag.
///
/// The caller sets it from any thread; the pipeline polls it once per frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Return [`SlidecastError::Cancelled`] once cancellation was requested.
    pub fn check(&self) -> SlidecastResult<()> {
        if self.is_cancelled() {
            Err(SlidecastError::Cancelled)
        } else {
            Ok(())
        }
    }
}
