//! ICC parse errors

use thiserror::Error;

/// Why a byte buffer could not be read as an ICC profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IccError {
    #[error("profile is {actual} bytes, at least {expected} needed")]
    TooSmall { expected: usize, actual: usize },

    #[error("file signature is 0x{0:08X}, not 'acsp'")]
    InvalidSignature(u32),

    #[error("header declares {header_size} bytes but {actual_size} were given")]
    SizeMismatch { header_size: u32, actual_size: usize },

    #[error("tag 0x{tag:08X} at {offset}+{size} runs past the {profile_size} byte profile")]
    TagOutOfBounds {
        tag: u32,
        offset: u32,
        size: u32,
        profile_size: usize,
    },

    /// Truncated or inconsistent tag payload
    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

pub(crate) fn corrupted(msg: impl Into<String>) -> IccError {
    IccError::CorruptedData(msg.into())
}
