pub type SlidecastResult<T> = Result<T, SlidecastError>;

/// Failure kinds of one encode run.
///
/// [`SlidecastError::Cancelled`] is a normal early exit, not a user-facing failure; check it with
/// [`SlidecastError::is_cancelled`] before surfacing a message.
#[derive(thiserror::Error, Debug)]
pub enum SlidecastError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("failed to decode {what} {index}/{total}: {msg}")]
    Decode {
        what: &'static str,
        /// 1-based position of the failing item.
        index: u64,
        total: u64,
        msg: String,
    },

    #[error("encoder initialization failed: {0}")]
    EncoderInit(String),

    #[error("encoding frame {index}/{total} failed: {msg}")]
    FrameSubmission {
        /// 1-based output frame number.
        index: u64,
        total: u64,
        msg: String,
    },

    #[error("finalization failed: {0}")]
    Finalization(String),

    #[error("encoding cancelled")]
    Cancelled,

    #[error("resource exhausted: {0} (try a lower resolution or quality)")]
    ResourceExhausted(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidecastError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn decode(what: &'static str, index: u64, total: u64, msg: impl Into<String>) -> Self {
        Self::Decode {
            what,
            index,
            total,
            msg: msg.into(),
        }
    }

    pub fn encoder_init(msg: impl Into<String>) -> Self {
        Self::EncoderInit(msg.into())
    }

    pub fn frame_submission(index: u64, total: u64, msg: impl Into<String>) -> Self {
        Self::FrameSubmission {
            index,
            total,
            msg: msg.into(),
        }
    }

    pub fn finalization(msg: impl Into<String>) -> Self {
        Self::Finalization(msg.into())
    }

    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
