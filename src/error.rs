use thiserror::Error;

#[doc = r#"
A set of errors that can occur while decoding bytes into the midi representation.

Every variant is fatal for the decode call that produced it; partial results
are never returned. Recoverable oddities (a meta event whose declared length
disagrees with the bytes actually present, a header division wider than 15
bits) are reported through [`log::warn!`] instead.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the field being read was complete.
    #[error("input truncated while reading {0}")]
    TruncatedInput(&'static str),

    /// An event status byte this crate does not understand.
    #[error("unsupported status byte {0:#04x}")]
    UnsupportedStatus(u8),

    /// A feature of the format that is intentionally unimplemented.
    #[error("{0} is not supported")]
    NotSupported(&'static str),

    /// A chunk tag other than `MThd` or `MTrk`.
    #[error("unknown chunk type {0:?}")]
    UnknownChunkType([u8; 4]),

    /// A value too large for a four-byte variable-length quantity.
    #[error("value {0} does not fit in a four-byte variable-length quantity")]
    ValueOutOfRange(u32),

    /// A header format word other than 0, 1 or 2.
    #[error("unrecognized file format {0}")]
    InvalidFormat(u16),
}

/// The decode result type (see [`DecodeError`])
pub type DecodeResult<T> = Result<T, DecodeError>;

#[doc = r#"
Errors raised by the track editing operations.

Editing errors are detected before any mutation happens, so a failed edit
leaves the track exactly as it was.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The operation's precondition does not hold for the targeted event.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// The event index does not exist in the track.
    #[error("event index {0} is out of bounds")]
    OutOfBounds(usize),
}

#[doc = r#"
Errors surfaced by the whole-file read and write helpers.
"#]
#[derive(Debug, Error)]
pub enum FileError {
    /// The underlying file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The file contents could not be decoded or re-encoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
