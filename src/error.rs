//! Error types for SYSEX decoding, library building and frame reception.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for tx7patch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding banks or talking to a transport
#[derive(Debug, Error)]
pub enum Error {
    /// The buffer does not start with `0xF0`, or carries a format code
    /// other than single voice (`0x00`) or 32 voice bulk (`0x09`).
    #[error("malformed SYSEX header (start 0x{start:02X}, format 0x{format:02X})")]
    MalformedHeader {
        /// First byte of the buffer
        start: u8,
        /// Format code found at offset 3
        format: u8,
    },

    /// The declared size implies more bytes than the buffer holds.
    #[error("truncated SYSEX: header declares {declared} payload bytes, buffer has {actual} bytes")]
    Truncated {
        /// Payload size from the 14-bit size field
        declared: usize,
        /// Length of the whole buffer
        actual: usize,
    },

    /// Reading a file or directory failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No complete frame arrived within the bound
    #[error("timed out after {0:?} waiting for a complete SYSEX frame")]
    Timeout(Duration),

    /// The wait was cancelled through a [`crate::CancelToken`]
    #[error("frame reception cancelled")]
    Cancelled,

    /// The transport side of a channel went away
    #[error("transport disconnected")]
    Disconnected,

    /// A voice index past the end of the current view
    #[error("voice index {index} out of range ({len} voices)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the view the index was applied to
        len: usize,
    },

    /// A bulk bank can hold at most 32 voices
    #[error("a bulk bank holds at most 32 voices, got {0}")]
    TooManyVoices(usize),
}

impl Error {
    /// Structural problems with a single buffer. Library ingestion skips
    /// the buffer instead of failing.
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::MalformedHeader { .. } | Error::Truncated { .. })
    }
}
