pub type AnimpackResult<T> = Result<T, AnimpackError>;

#[derive(thiserror::Error, Debug)]
pub enum AnimpackError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnimpackError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Reasons a still-image buffer could not be split into records.
///
/// Offsets are byte positions inside the input buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer does not start with the png signature")]
    BadSignature,

    #[error("record at offset {offset} needs {needed} bytes but only {available} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("IHDR record at offset {offset} is too short ({len} data bytes)")]
    ShortHeader { offset: usize, len: u32 },

    #[error("pixel data at offset {offset} appears before any IHDR record")]
    PixelDataBeforeHeader { offset: usize },
}
