use core::fmt;
use std::{fs, path::Path};

use crate::{
    Chunk, DecodeError, DecodeResult, FileError, HeaderChunk, TrackChunk,
};

#[doc = r#"
An in-memory file: an ordered sequence of [`Chunk`]s, conventionally one
header followed by one or more tracks.

Decoding is whole-buffer; the entire byte source is held in memory. See
[`MidiFile::parse`] and [`MidiFile::to_bytes`] for the codec surface and
[`MidiFile::read_from`]/[`MidiFile::write_to`] for the file helpers.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    /// The chunks in file order.
    pub chunks: Vec<Chunk>,
}

impl MidiFile {
    /// A file over an already-ordered chunk sequence.
    pub const fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Parses a byte buffer into its chunk sequence.
    ///
    /// Repeatedly reads a 4-byte tag and a 4-byte big-endian length,
    /// dispatches the framed payload to the matching chunk decoder and
    /// continues at the next chunk boundary until the buffer is exhausted.
    pub fn parse(bytes: &[u8]) -> DecodeResult<Self> {
        let mut chunks = Vec::new();
        let mut data = bytes;
        while !data.is_empty() {
            let [t0, t1, t2, t3, l0, l1, l2, l3, ..] = *data else {
                return Err(DecodeError::TruncatedInput("chunk frame"));
            };
            let length = u32::from_be_bytes([l0, l1, l2, l3]) as usize;
            let end = 8usize
                .checked_add(length)
                .filter(|&end| end <= data.len())
                .ok_or(DecodeError::TruncatedInput("chunk payload"))?;

            chunks.push(Chunk::decode([t0, t1, t2, t3], &data[8..end])?);
            data = &data[end..];
        }
        Ok(Self { chunks })
    }

    /// Encodes every chunk in sequence order, framed.
    ///
    /// When `clean` is true, droppable meta events are left out of the
    /// track payloads.
    pub fn to_bytes(&self, clean: bool) -> DecodeResult<Vec<u8>> {
        let mut out = Vec::new();
        for chunk in &self.chunks {
            chunk.encode_into(&mut out, clean)?;
        }
        Ok(out)
    }

    /// Reads and parses a whole file. The handle is released before this
    /// returns.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let bytes = fs::read(path)?;
        Ok(Self::parse(&bytes)?)
    }

    /// Encodes and writes the file in one call.
    pub fn write_to(&self, path: impl AsRef<Path>, clean: bool) -> Result<(), FileError> {
        fs::write(path, self.to_bytes(clean)?)?;
        Ok(())
    }

    /// The first header chunk, if any.
    pub fn header(&self) -> Option<&HeaderChunk> {
        self.chunks.iter().find_map(|chunk| match chunk {
            Chunk::Header(header) => Some(header),
            _ => None,
        })
    }

    /// The track chunks in file order.
    pub fn tracks(&self) -> Vec<&TrackChunk> {
        self.chunks
            .iter()
            .filter_map(|chunk| match chunk {
                Chunk::Track(track) => Some(track),
                _ => None,
            })
            .collect()
    }

    /// Mutable access to the track chunks in file order.
    pub fn tracks_mut(&mut self) -> Vec<&mut TrackChunk> {
        self.chunks
            .iter_mut()
            .filter_map(|chunk| match chunk {
                Chunk::Track(track) => Some(track),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for MidiFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            chunk.fmt(f)?;
        }
        Ok(())
    }
}
