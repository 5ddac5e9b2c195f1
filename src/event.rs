use core::fmt;

use num_enum::TryFromPrimitive;

use crate::{DecodeError, DecodeResult, varlen};

/// Meta-event type of the end-of-track marker.
pub const META_END_OF_TRACK: u8 = 0x2F;

/// The pitch-bend value meaning "no bend".
pub const PITCH_BEND_CENTER: u16 = 0x2000;

/// The recognized status bytes, channel bits masked off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
enum Status {
    NoteOff = 0x80,
    NoteOn = 0x90,
    PitchBend = 0xE0,
    Meta = 0xFF,
}

#[doc = r#"
One timed event in a track.

The `delta_time` is relative to the immediately preceding event in the same
track, so the cumulative sum of delta-times up to any index is that event's
absolute tick position. The editing operations on
[`TrackChunk`](crate::TrackChunk) maintain this invariant.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Ticks elapsed since the previous event in the same track.
    pub delta_time: u32,
    /// What the event does.
    pub kind: EventKind,
}

#[doc = r#"
The set of event payloads this crate understands.

Anything else on the wire fails decoding with
[`DecodeError::UnsupportedStatus`].
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// `0x9c kk vv`: key `kk` pressed on channel `c` with velocity `vv`.
    NoteOn {
        /// Channel, 0-15.
        channel: u8,
        /// Key number, 0-127. Key 69 is concert A (440 Hz).
        key: u8,
        /// Strike velocity, 0-127.
        velocity: u8,
    },
    /// `0x8c kk vv`: key `kk` released on channel `c`.
    NoteOff {
        /// Channel, 0-15.
        channel: u8,
        /// Key number, 0-127.
        key: u8,
        /// Release velocity, 0-127.
        velocity: u8,
    },
    /// `0xEc ll hh`: 14-bit pitch-bend on channel `c`, least significant
    /// seven bits first.
    PitchBend {
        /// Channel, 0-15.
        channel: u8,
        /// 14-bit bend amount; [`PITCH_BEND_CENTER`] is no bend.
        value: u16,
    },
    /// `0xFF tt len data`: out-of-band data such as the end-of-track marker.
    Meta {
        /// The meta-event type byte.
        meta_type: u8,
        /// The length the event declares for its payload. Kept separately
        /// from `data` so a mismatched event re-encodes the way it was read.
        length: u32,
        /// The payload bytes actually present.
        data: Vec<u8>,
    },
}

impl Event {
    /// Create a note-on event.
    pub const fn note_on(delta_time: u32, key: u8, velocity: u8, channel: u8) -> Self {
        Self {
            delta_time,
            kind: EventKind::NoteOn {
                channel,
                key,
                velocity,
            },
        }
    }

    /// Create a note-off event.
    pub const fn note_off(delta_time: u32, key: u8, velocity: u8, channel: u8) -> Self {
        Self {
            delta_time,
            kind: EventKind::NoteOff {
                channel,
                key,
                velocity,
            },
        }
    }

    /// Create a pitch-bend event.
    ///
    /// The requested value is clamped into the representable range
    /// `0..=0x3FFF` rather than rejected.
    pub const fn pitch_bend(delta_time: u32, channel: u8, value: i32) -> Self {
        let value = if value < 0 {
            0
        } else if value > 0x3FFF {
            0x3FFF
        } else {
            value as u16
        };
        Self {
            delta_time,
            kind: EventKind::PitchBend { channel, value },
        }
    }

    /// Create a meta event. The declared length is taken from the payload.
    pub fn meta(delta_time: u32, meta_type: u8, data: Vec<u8>) -> Self {
        Self {
            delta_time,
            kind: EventKind::Meta {
                meta_type,
                length: data.len() as u32,
                data,
            },
        }
    }

    /// Create the end-of-track marker.
    pub fn end_of_track(delta_time: u32) -> Self {
        Self::meta(delta_time, META_END_OF_TRACK, Vec::new())
    }

    /// True for meta events a size-reducing encode may drop.
    ///
    /// The end-of-track marker is never droppable.
    pub fn is_droppable(&self) -> bool {
        match &self.kind {
            EventKind::Meta { meta_type, .. } => *meta_type != META_END_OF_TRACK,
            _ => false,
        }
    }

    /// Appends the wire encoding of this event to `out`.
    ///
    /// `last_status` threads the running-status state across a track: a
    /// channel-voice event whose status byte equals the last one emitted
    /// omits it, and a meta event resets the state to `0xFF` so the next
    /// channel-voice event re-emits its status explicitly.
    pub fn encode_into(
        &self,
        out: &mut Vec<u8>,
        last_status: &mut Option<u8>,
    ) -> DecodeResult<()> {
        out.extend_from_slice(&varlen::encode(self.delta_time)?);
        match &self.kind {
            EventKind::NoteOn {
                channel,
                key,
                velocity,
            } => {
                push_status(out, Status::NoteOn as u8 | (channel & 0x0F), last_status);
                out.push(key & 0x7F);
                out.push(velocity & 0x7F);
            }
            EventKind::NoteOff {
                channel,
                key,
                velocity,
            } => {
                push_status(out, Status::NoteOff as u8 | (channel & 0x0F), last_status);
                out.push(key & 0x7F);
                out.push(velocity & 0x7F);
            }
            EventKind::PitchBend { channel, value } => {
                push_status(out, Status::PitchBend as u8 | (channel & 0x0F), last_status);
                out.push((value & 0x7F) as u8);
                out.push(((value >> 7) & 0x7F) as u8);
            }
            EventKind::Meta {
                meta_type,
                length,
                data,
            } => {
                out.push(Status::Meta as u8);
                *last_status = Some(Status::Meta as u8);
                out.push(*meta_type);
                out.extend_from_slice(&varlen::encode(*length)?);
                out.extend_from_slice(data);
            }
        }
        Ok(())
    }

    /// Decodes one event from the front of `bytes`.
    ///
    /// `last_status` carries the running-status state supplied by the track
    /// decode loop. A byte with a clear top bit where a status byte is
    /// expected is the first data byte of a repeated status; the last full
    /// status is reused and the byte is not consumed as a status.
    ///
    /// Returns the event and the unconsumed remainder of the slice.
    pub fn decode<'a>(
        bytes: &'a [u8],
        last_status: &mut Option<u8>,
    ) -> DecodeResult<(Self, &'a [u8])> {
        let (delta_time, rest) = varlen::decode(bytes)?;
        let (&first, _) = rest
            .split_first()
            .ok_or(DecodeError::TruncatedInput("event status"))?;

        let (status, data) = if first & 0x80 == 0 {
            // Running status. A data byte before any status byte has nothing
            // to repeat.
            let status = last_status.ok_or(DecodeError::UnsupportedStatus(first))?;
            (status, rest)
        } else {
            *last_status = Some(first);
            (first, &rest[1..])
        };

        if status == Status::Meta as u8 {
            let (&meta_type, data) = data
                .split_first()
                .ok_or(DecodeError::TruncatedInput("meta event type"))?;
            let (length, data) = varlen::decode(data)?;
            let take = (length as usize).min(data.len());
            if take != length as usize {
                log::warn!(
                    "meta event {meta_type:#04x} declares {length} payload bytes but only {take} remain"
                );
            }
            let event = Self {
                delta_time,
                kind: EventKind::Meta {
                    meta_type,
                    length,
                    data: data[..take].to_vec(),
                },
            };
            return Ok((event, &data[take..]));
        }

        let channel = status & 0x0F;
        match Status::try_from(status & 0xF0) {
            Ok(Status::NoteOff) => {
                let (key, velocity, rest) = take_two(data, "note-off data")?;
                Ok((Self::note_off(delta_time, key, velocity, channel), rest))
            }
            Ok(Status::NoteOn) => {
                let (key, velocity, rest) = take_two(data, "note-on data")?;
                Ok((Self::note_on(delta_time, key, velocity, channel), rest))
            }
            Ok(Status::PitchBend) => {
                let (low, high, rest) = take_two(data, "pitch-bend data")?;
                let value = (u16::from(high & 0x7F) << 7) | u16::from(low & 0x7F);
                let event = Self {
                    delta_time,
                    kind: EventKind::PitchBend { channel, value },
                };
                Ok((event, rest))
            }
            _ => Err(DecodeError::UnsupportedStatus(status)),
        }
    }
}

fn push_status(out: &mut Vec<u8>, status: u8, last_status: &mut Option<u8>) {
    if *last_status != Some(status) {
        out.push(status);
        *last_status = Some(status);
    }
}

fn take_two<'a>(data: &'a [u8], what: &'static str) -> DecodeResult<(u8, u8, &'a [u8])> {
    match data {
        [a, b, rest @ ..] => Ok((*a, *b, rest)),
        _ => Err(DecodeError::TruncatedInput(what)),
    }
}

const COLUMN: usize = 12;

impl fmt::Display for Event {
    /// One table row: delta time, status name, channel, key, velocity, misc.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.delta_time;
        match &self.kind {
            EventKind::NoteOn {
                channel,
                key,
                velocity,
            } => write!(
                f,
                "{dt:<COLUMN$}{:<COLUMN$}{channel:<COLUMN$}{key:<COLUMN$}{velocity:<COLUMN$}",
                "Note on"
            ),
            EventKind::NoteOff {
                channel,
                key,
                velocity,
            } => write!(
                f,
                "{dt:<COLUMN$}{:<COLUMN$}{channel:<COLUMN$}{key:<COLUMN$}{velocity:<COLUMN$}",
                "Note off"
            ),
            EventKind::PitchBend { channel, value } => write!(
                f,
                "{dt:<COLUMN$}{:<COLUMN$}{channel:<COLUMN$}{:<COLUMN$}{:<COLUMN$}[{}]",
                "Pitch bend",
                "",
                "",
                i32::from(*value) - i32::from(PITCH_BEND_CENTER)
            ),
            EventKind::Meta {
                meta_type, data, ..
            } => write!(
                f,
                "{dt:<COLUMN$}{:<COLUMN$}{:<COLUMN$}{:<COLUMN$}{:<COLUMN$}[{meta_type:#04x}] {data:?}",
                "Meta event", "", "", ""
            ),
        }
    }
}
