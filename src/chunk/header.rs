use core::fmt;

use num_enum::TryFromPrimitive;

use crate::{DecodeError, DecodeResult};

#[doc = r#"
How the tracks of a file relate to each other.

Stored as a big-endian 16-bit word in the header payload; only 0, 1 and 2
are defined.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Format 0: a single multi-channel track.
    SingleTrack = 0,
    /// Format 1: two or more tracks played simultaneously.
    Simultaneous = 1,
    /// Format 2: independent tracks played sequentially.
    SequentiallyIndependent = 2,
}

impl Format {
    fn name(&self) -> &'static str {
        match self {
            Self::SingleTrack => "(0) Single Track",
            Self::Simultaneous => "(1) Simultaneous Tracks",
            Self::SequentiallyIndependent => "(2) Sequential Tracks",
        }
    }
}

#[doc = r#"
The header's time division.

This is either the number of delta ticks per quarter note or the alternative
SMPTE format. SMPTE timing is intentionally unsupported: decoding a division
with bit 15 set fails with [`DecodeError::NotSupported`], and this crate
never constructs the [`Division::Smpte`] variant itself.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Division {
    /// Delta times count ticks of a quarter-note subdivision. 15 bits.
    TicksPerQuarterNote(u16),
    /// Delta times count subdivisions of a second. Unsupported.
    Smpte,
}

impl Division {
    /// Returns Some if the division is defined as ticks per quarter note.
    ///
    /// The leading bit is disregarded, so 0-32767.
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(ticks) => Some(*ticks & 0x7FFF),
            Self::Smpte => None,
        }
    }
}

#[doc = r#"
The `MThd` chunk: format, track count and time division.

Always six payload bytes. Created once per file and immutable afterwards;
build a new header to change it.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderChunk {
    format: Format,
    track_count: u16,
    division: Division,
}

impl HeaderChunk {
    /// Create a header from its parts.
    pub const fn new(format: Format, track_count: u16, division: Division) -> Self {
        Self {
            format,
            track_count,
            division,
        }
    }

    /// A single-track header with the given tick rate.
    pub const fn basic(ticks_per_quarter_note: u16) -> Self {
        Self {
            format: Format::SingleTrack,
            track_count: 1,
            division: Division::TicksPerQuarterNote(ticks_per_quarter_note),
        }
    }

    /// Decodes the six-byte header payload.
    pub fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let [f0, f1, t0, t1, d0, d1, ..] = *payload else {
            return Err(DecodeError::TruncatedInput("header chunk payload"));
        };

        let raw_format = u16::from_be_bytes([f0, f1]);
        let format = u8::try_from(raw_format)
            .ok()
            .and_then(|byte| Format::try_from(byte).ok())
            .ok_or(DecodeError::InvalidFormat(raw_format))?;

        let track_count = u16::from_be_bytes([t0, t1]);

        let raw_division = u16::from_be_bytes([d0, d1]);
        if raw_division & 0x8000 != 0 {
            return Err(DecodeError::NotSupported("SMPTE division"));
        }

        Ok(Self {
            format,
            track_count,
            division: Division::TicksPerQuarterNote(raw_division),
        })
    }

    /// Encodes the six-byte header payload.
    ///
    /// A tick rate wider than 15 bits is truncated with a warning; callers
    /// that need round-trip fidelity must pre-validate.
    pub fn payload_bytes(&self) -> DecodeResult<Vec<u8>> {
        let mut out = Vec::with_capacity(6);
        out.extend_from_slice(&(self.format as u16).to_be_bytes());
        out.extend_from_slice(&self.track_count.to_be_bytes());
        match self.division {
            Division::TicksPerQuarterNote(ticks) => {
                if ticks >= 0x8000 {
                    log::warn!(
                        "converting delta ticks {ticks} larger than 2^15 = 32768 cuts the extra bits"
                    );
                }
                out.extend_from_slice(&(ticks & 0x7FFF).to_be_bytes());
            }
            Division::Smpte => return Err(DecodeError::NotSupported("SMPTE division")),
        }
        Ok(out)
    }

    /// The file format.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// The number of tracks the header declares.
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// The time division.
    pub const fn division(&self) -> Division {
        self.division
    }
}

impl fmt::Display for HeaderChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let division = match self.division.ticks_per_quarter_note() {
            Some(ticks) => format!("Delta Ticks: {ticks}"),
            None => "[[ Unsupported Division Format ]]".to_string(),
        };
        write!(
            f,
            "Header:\n\tNumber of Tracks: {}\n\tFormat: {}\n\tDivision: {division}",
            self.track_count,
            self.format.name()
        )
    }
}
