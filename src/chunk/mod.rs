#![doc = r#"
Contains the chunk types of a standard MIDI file.

# Overview

A file is a sequence of chunks, each framed by a 4-character ASCII tag and a
32-bit big-endian length, followed by that many payload bytes. The format
defines exactly two chunk types, so [`Chunk`] is a closed dispatch enum
rather than an open trait.

## [`HeaderChunk`]

The header (tag `MThd`) is conventionally the first chunk. It carries the
file format, the declared track count and the time division. Its payload is
always six bytes.

## [`TrackChunk`]

Track chunks (tag `MTrk`) hold the timed events and own the running-status
decode loop and the note editing operations.

Any other tag fails decoding with
[`DecodeError::UnknownChunkType`](crate::DecodeError::UnknownChunkType).
"#]

mod header;
pub use header::*;

mod track;
pub use track::*;

use core::fmt;

use crate::{DecodeError, DecodeResult};

/// The header chunk tag.
pub const HEADER_TAG: [u8; 4] = *b"MThd";

/// The track chunk tag.
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

#[doc = r#"
One chunk of a file: either the header or a track.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Chunk {
    /// An `MThd` chunk.
    Header(HeaderChunk),
    /// An `MTrk` chunk.
    Track(TrackChunk),
}

impl Chunk {
    /// Dispatches a framed payload to the decoder for its tag.
    pub fn decode(tag: [u8; 4], payload: &[u8]) -> DecodeResult<Self> {
        match tag {
            HEADER_TAG => HeaderChunk::decode(payload).map(Self::Header),
            TRACK_TAG => TrackChunk::decode(payload).map(Self::Track),
            other => Err(DecodeError::UnknownChunkType(other)),
        }
    }

    /// The chunk's four-byte tag.
    pub const fn tag(&self) -> [u8; 4] {
        match self {
            Self::Header(_) => HEADER_TAG,
            Self::Track(_) => TRACK_TAG,
        }
    }

    /// Encodes the chunk payload, without the tag/length frame.
    ///
    /// `clean` only affects track chunks (droppable meta events are
    /// skipped); the length written by the framing layer is always computed
    /// after filtering.
    pub fn payload_bytes(&self, clean: bool) -> DecodeResult<Vec<u8>> {
        match self {
            Self::Header(header) => header.payload_bytes(),
            Self::Track(track) => track.payload_bytes(clean),
        }
    }

    /// The encoded size of the chunk including its eight framing bytes.
    pub fn byte_len(&self, clean: bool) -> DecodeResult<usize> {
        Ok(self.payload_bytes(clean)?.len() + 8)
    }

    /// Appends the framed chunk (tag, big-endian length, payload) to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>, clean: bool) -> DecodeResult<()> {
        let payload = self.payload_bytes(clean)?;
        out.extend_from_slice(&self.tag());
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&payload);
        Ok(())
    }
}

impl From<HeaderChunk> for Chunk {
    fn from(value: HeaderChunk) -> Self {
        Self::Header(value)
    }
}

impl From<TrackChunk> for Chunk {
    fn from(value: TrackChunk) -> Self {
        Self::Track(value)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header(header) => header.fmt(f),
            Self::Track(track) => track.fmt(f),
        }
    }
}
