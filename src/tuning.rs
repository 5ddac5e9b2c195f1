#![doc = r#"
Maps arbitrarily tuned pitches onto key numbers and pitch-bend values.

The tuning engine that produces frequencies is an external collaborator;
this module only consumes its output, a [`TunedNote`] carrying a frequency
in hertz and a deviation in cents from the nearest standard-pitch key.
"#]

use crate::{Chunk, Event, HeaderChunk, MidiFile, PITCH_BEND_CENTER, TrackChunk};

/// Key number of concert A (440 Hz).
pub const CONCERT_A_KEY: u8 = 69;

const CONCERT_A_HZ: f64 = 440.0;

#[doc = r#"
A pitch as delivered by the tuning engine.
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TunedNote {
    /// Frequency in hertz.
    pub frequency: f64,
    /// Cents off from the nearest standard-pitch key, for the bend.
    pub cents_off: f64,
}

/// Cents between `frequency` and concert A.
pub fn cents_from_concert_a(frequency: f64) -> f64 {
    1200.0 * (frequency / CONCERT_A_HZ).log2()
}

/// The key number nearest to `frequency`, clamped to 0-127.
pub fn closest_key(frequency: f64) -> u8 {
    let key = f64::from(CONCERT_A_KEY) + cents_from_concert_a(frequency) / 100.0;
    key.round().clamp(0.0, 127.0) as u8
}

/// The 14-bit pitch-bend value expressing `cents_off`, given the channel's
/// bend range in semitones. The full 14-bit sweep spans the whole range, so
/// a deviation of `range / 2` semitones lands on the endpoints.
///
/// The result may fall outside 14 bits for a wider deviation;
/// [`Event::pitch_bend`] clamps it.
pub fn bend_value(cents_off: f64, bend_range_semitones: f64) -> i32 {
    let scale = f64::from(0x4000) / (bend_range_semitones * 100.0);
    i32::from(PITCH_BEND_CENTER) + (cents_off * scale).round() as i32
}

/// Builds a one-track file sounding `notes` together as a chord.
///
/// Each note gets its own channel (skipping `base_channel`, typically the
/// percussion channel) with a pitch-bend for its cent deviation followed by
/// a note-on at velocity 80; a whole note later every channel gets its
/// note-off, the first one carrying the whole-note delta.
pub fn chord_file(notes: &[TunedNote], base_channel: u8, bend_range_semitones: f64) -> MidiFile {
    const TICKS_PER_QUARTER_NOTE: u16 = 1;
    const VELOCITY: u8 = 80;

    let channel = |i: usize| -> u8 {
        let i = i as u8;
        if i < base_channel { i } else { i + 1 }
    };

    let mut events = Vec::with_capacity(notes.len() * 3);
    for (i, note) in notes.iter().enumerate() {
        let ch = channel(i);
        events.push(Event::pitch_bend(
            0,
            ch,
            bend_value(note.cents_off, bend_range_semitones),
        ));
        events.push(Event::note_on(0, closest_key(note.frequency), VELOCITY, ch));
    }

    let mut delta_time = u32::from(TICKS_PER_QUARTER_NOTE) * 4; // one whole note
    for (i, note) in notes.iter().enumerate() {
        events.push(Event::note_off(
            delta_time,
            closest_key(note.frequency),
            0,
            channel(i),
        ));
        delta_time = 0;
    }

    MidiFile::new(vec![
        Chunk::Header(HeaderChunk::basic(TICKS_PER_QUARTER_NOTE)),
        Chunk::Track(TrackChunk::from_events(events)),
    ])
}
