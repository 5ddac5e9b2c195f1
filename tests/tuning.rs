use pretty_assertions::assert_eq;
use smf_edit::prelude::*;

#[test]
fn chord_file_lays_out_bends_then_notes() {
    // a just-intonation major third: 5/4 above A4, 386 cents, -14 off the key
    let notes = [
        TunedNote {
            frequency: 440.0,
            cents_off: 0.0,
        },
        TunedNote {
            frequency: 550.0,
            cents_off: -13.69,
        },
    ];

    let file = chord_file(&notes, 9, 2.0);

    let header = file.header().unwrap();
    assert_eq!(header.format(), Format::SingleTrack);
    assert_eq!(header.track_count(), 1);
    assert_eq!(header.division().ticks_per_quarter_note(), Some(1));

    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 6);

    // channel 0: A4, no bend
    assert_eq!(
        events[0].kind,
        EventKind::PitchBend {
            channel: 0,
            value: PITCH_BEND_CENTER
        }
    );
    assert_eq!(
        events[1].kind,
        EventKind::NoteOn {
            channel: 0,
            key: 69,
            velocity: 80
        }
    );

    // channel 1: C#6 rounded from 550 Hz, bent 13.69 cents flat
    let EventKind::PitchBend { channel: 1, value } = events[2].kind else {
        panic!("expected a pitch bend on channel 1");
    };
    assert!(value < PITCH_BEND_CENTER);
    assert!(matches!(
        events[3].kind,
        EventKind::NoteOn {
            channel: 1,
            key: 73,
            ..
        }
    ));

    // note-offs a whole note later; only the first carries the delta
    assert_eq!(events[4].delta_time, 4);
    assert!(matches!(
        events[4].kind,
        EventKind::NoteOff { channel: 0, key: 69, .. }
    ));
    assert_eq!(events[5].delta_time, 0);
    assert!(matches!(
        events[5].kind,
        EventKind::NoteOff { channel: 1, key: 73, .. }
    ));
}

#[test]
fn chord_file_skips_the_base_channel() {
    let note = TunedNote {
        frequency: 440.0,
        cents_off: 0.0,
    };
    let notes = [note; 3];

    let file = chord_file(&notes, 1, 2.0);
    let channels: Vec<u8> = file.tracks()[0]
        .events()
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::NoteOn { channel, .. } => Some(channel),
            _ => None,
        })
        .collect();

    assert_eq!(channels, vec![0, 2, 3]);
}

#[test]
fn chord_file_round_trips() {
    let notes = [
        TunedNote {
            frequency: 330.0,
            cents_off: 1.96,
        },
        TunedNote {
            frequency: 440.0,
            cents_off: 0.0,
        },
    ];
    let file = chord_file(&notes, 9, 2.0);
    let bytes = file.to_bytes(false).unwrap();
    assert_eq!(MidiFile::parse(&bytes).unwrap(), file);
}

#[test]
fn wide_deviations_clamp_to_the_bend_range() {
    let note = TunedNote {
        frequency: 440.0,
        cents_off: 450.0, // wider than a 2-semitone range can express
    };
    let file = chord_file(&[note], 9, 2.0);

    let EventKind::PitchBend { value, .. } = file.tracks()[0].events()[0].kind else {
        panic!("expected a pitch bend");
    };
    assert_eq!(value, 0x3FFF);
}
