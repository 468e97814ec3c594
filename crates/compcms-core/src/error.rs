//! Error types for compcms

use thiserror::Error;

use crate::icc::IccError;

/// Result type for compcms operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by profile ingestion, transform construction and setup.
///
/// The display strings are the messages handed back to clients.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("No ICC data.")]
    NoIccData,

    #[error("Too much ICC data.")]
    IccTooLarge,

    #[error("ICC data not understood.")]
    IccNotUnderstood(#[source] IccError),

    #[error("ICC profile major version {0} is unsupported, should be 2 or 4.")]
    UnsupportedVersion(u8),

    #[error("ICC profile must contain 3 channels for the color space, not {0}.")]
    ChannelCount(u32),

    #[error("ICC profile is required to be of Display device class, but it is {name} class (0x{signature:08x})")]
    DeviceClass { name: &'static str, signature: u32 },

    /// The color manager does not offer this operation
    #[error("{0}")]
    Unsupported(String),

    /// A profile or transform could not be built from valid input
    #[error("{0}")]
    Construction(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}
