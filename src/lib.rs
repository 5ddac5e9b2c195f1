#![doc = r#"
A codec and editor for standard MIDI files.

`smf-edit` parses a byte buffer into a chunk sequence (one header, one or
more event tracks), lets you edit the tracks while preserving their
timelines, and serializes the result back to bytes, bit-exact where the
input was well formed.

# Example

```rust
use smf_edit::prelude::*;

let mut track = TrackChunk::new();
track.insert_note(0, 60, 4, 64, 0); // middle C for a quarter note
track.insert_event(Event::end_of_track(8));

let file = MidiFile::new(vec![
    Chunk::Header(HeaderChunk::basic(96)),
    Chunk::Track(track),
]);

let bytes = file.to_bytes(false)?;
let reparsed = MidiFile::parse(&bytes)?;
assert_eq!(file, reparsed);
# Ok::<(), smf_edit::DecodeError>(())
```

# Scope

SMPTE time divisions are intentionally unsupported, meta events other than
end-of-track are carried opaquely, and decoding is whole-buffer (no
streaming). Non-fatal oddities in the input are reported through the
[`log`] facade; install any logger to see them.
"#]

mod error;
pub use error::*;

pub mod varlen;

mod event;
pub use event::*;

pub mod chunk;
pub use chunk::*;

mod file;
pub use file::*;

pub mod tuning;

/// Re-exports the types most users need.
pub mod prelude {
    pub use crate::{
        chunk::{Chunk, Division, Format, HeaderChunk, TrackChunk},
        error::{DecodeError, DecodeResult, EditError, FileError},
        event::{Event, EventKind, META_END_OF_TRACK, PITCH_BEND_CENTER},
        file::MidiFile,
        tuning::{TunedNote, bend_value, chord_file, closest_key},
        varlen,
    };
}
